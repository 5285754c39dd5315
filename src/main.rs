//! `nba-sim`: a thin smoke-test harness standing in for the HTTP server
//! (spec §1 Non-goals). Builds two sample teams, runs one game through
//! the full pipeline — `simulate_game` -> `adapt_raw` -> `ingest_game_result`
//! -> a `league_db` snapshot — and prints a box score, in the teacher's
//! `main.rs` idiom (`env_logger` + `log` + `color-eyre`).

use cli::sample_team;
use color_eyre::eyre::Result;
use league_core::orchestrator::simulate_game;
use league_core::possession::Rules;
use league_core::result::adapter::adapt_raw;
use league_core::result::v2::{GameContext, Phase};
use league_core::team::{DefenseScheme, OffenseScheme};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let home = sample_team("BOS", OffenseScheme::SpreadHeavyPnR, DefenseScheme::Drop);
    let away = sample_team("LAL", OffenseScheme::DriveKick, DefenseScheme::SwitchEverything);

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(7);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    log::info!("simulating {} @ {} (seed={seed})", away.team_id, home.team_id);
    let raw = simulate_game(&mut rng, home, away, "default", Rules::default())?;

    let ctx = GameContext {
        game_id: format!("2025-26-{seed:06}"),
        date: "2025-10-21".to_string(),
        season_id: "2025-26".to_string(),
        phase: Phase::Regular,
        home_team_id: "BOS".to_string(),
        away_team_id: "LAL".to_string(),
    };
    let v2 = adapt_raw(&raw, &ctx)?;

    let mut league = league_core::league::LeagueState::new("2025-26");
    league_core::league::ingest_game_result(&mut league, &v2)?;

    print_box_score(&v2);

    let snapshot_path = std::env::temp_dir().join("nba-sim-league.json.gz");
    league_db::save_to_path(&league, &snapshot_path)?;
    log::info!("league snapshot written to {}", snapshot_path.display());

    Ok(())
}

fn print_box_score(v2: &league_core::result::v2::GameResultV2) {
    println!(
        "{} final: {}",
        v2.game.game_id,
        v2.final_scores
            .iter()
            .map(|(team_id, pts)| format!("{team_id} {pts}"))
            .collect::<Vec<_>>()
            .join(" - ")
    );
    for (team_id, team) in &v2.teams {
        println!(
            "\n{team_id}: {} PTS ({}/{} FG, {}/{} 3P, {}/{} FT, {} TOV, {} AST)",
            team.totals.pts,
            team.totals.fgm,
            team.totals.fga,
            team.totals.tpm,
            team.totals.tpa,
            team.totals.ftm,
            team.totals.fta,
            team.totals.tov,
            team.totals.ast,
        );
        for p in &team.players {
            println!(
                "  {:<12} {:>3} PTS  {}/{} FG  {}/{} 3P  {}/{} FT  {} REB  {} AST",
                p.player_id, p.pts, p.fgm, p.fga, p.tpm, p.tpa, p.ftm, p.fta, p.orb + p.drb, p.ast
            );
        }
    }
}
