//! Raw-rating -> derived-ability formula layer.
//!
//! Pure function, no state: a fixed linear combination of ~35 named raw
//! ratings (each in `[0,100]`, missing keys default to 50) produces the
//! 29 derived abilities the rest of the engine reads. Coefficients are
//! frozen tuning data, grounded verbatim on
//! `original_source/derived_formulas.py: compute_derived`.

use std::collections::HashMap;

/// Default value substituted for any raw rating the caller omitted.
pub const RAW_RATING_DEFAULT: f64 = 50.0;

/// The 35 raw-rating names this formula layer reads. Any name not present
/// in the input mapping reads as [`RAW_RATING_DEFAULT`].
pub const RAW_RATING_KEYS: &[&str] = &[
    "Close Shot", "Mid-Range Shot", "Three-Point Shot", "Free Throw", "Shot IQ",
    "Offensive Consistency", "Layup", "Standing Dunk", "Driving Dunk", "Post Hook",
    "Post Fade", "Post Control", "Draw Foul", "Hands", "Pass Accuracy", "Ball Handle",
    "Speed with Ball", "Pass IQ", "Pass Vision", "Interior Defense", "Perimeter Defense",
    "Steal", "Block", "Help Defense IQ", "Pass Perception", "Defensive Consistency",
    "Offensive Rebound", "Defensive Rebound", "Speed", "Agility", "Strength",
    "Vertical", "Stamina", "Hustle", "Overall Durability",
];

/// The 29 derived-ability keys this layer produces, in formula-table order.
pub const DERIVED_ABILITY_KEYS: &[&str] = &[
    "FIN_RIM", "FIN_DUNK", "FIN_CONTACT",
    "SHOT_MID_CS", "SHOT_3_CS", "SHOT_FT",
    "SHOT_MID_PU", "SHOT_3_OD", "SHOT_TOUCH",
    "POST_SCORE", "POST_CONTROL", "SEAL_POWER",
    "DRIVE_CREATE", "HANDLE_SAFE", "FIRST_STEP",
    "PASS_SAFE", "PASS_CREATE", "PNR_READ", "SHORTROLL_PLAY",
    "DEF_POA", "DEF_HELP", "DEF_STEAL", "DEF_RIM", "DEF_POST",
    "REB_OR", "REB_DR", "PHYSICAL", "ENDURANCE", "FAT_CAPACITY",
];

/// Raw ratings for a single player: rating name -> value in `[0,100]`.
pub type RawRatings = HashMap<String, f64>;

/// Derived abilities for a single player: ability key -> value in `[0,100]`.
pub type DerivedAbilities = HashMap<String, f64>;

fn get(raw: &RawRatings, key: &str) -> f64 {
    raw.get(key).copied().unwrap_or(RAW_RATING_DEFAULT)
}

fn clamp100(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}

/// Turn raw ratings into the 29 derived abilities, clamped to `[0,100]`.
///
/// Each output is a fixed weighted sum whose weights sum to 1; this
/// function never fails — an absent raw rating simply defaults to 50.
pub fn derive(raw: &RawRatings) -> DerivedAbilities {
    let g = |k: &str| get(raw, k);

    let fin_rim = 0.35 * g("Layup") + 0.20 * g("Close Shot") + 0.15 * g("Shot IQ")
        + 0.10 * g("Offensive Consistency") + 0.10 * g("Strength") + 0.10 * g("Vertical");
    let fin_dunk = 0.30 * g("Driving Dunk") + 0.25 * g("Standing Dunk") + 0.15 * g("Vertical")
        + 0.15 * g("Strength") + 0.10 * g("Hands") + 0.05 * g("Offensive Consistency");
    let fin_contact = 0.35 * g("Strength") + 0.25 * g("Vertical") + 0.15 * g("Driving Dunk")
        + 0.10 * g("Layup") + 0.10 * g("Draw Foul") + 0.05 * g("Overall Durability");

    let shot_mid_cs = 0.45 * g("Mid-Range Shot") + 0.20 * g("Close Shot") + 0.15 * g("Shot IQ")
        + 0.10 * g("Offensive Consistency") + 0.10 * g("Hands");
    let shot_3_cs = 0.55 * g("Three-Point Shot") + 0.15 * g("Shot IQ") + 0.10 * g("Offensive Consistency")
        + 0.10 * g("Hands") + 0.10 * g("Pass Vision");
    let shot_ft = 0.70 * g("Free Throw") + 0.15 * g("Shot IQ") + 0.15 * g("Offensive Consistency");

    let shot_mid_pu = 0.40 * g("Mid-Range Shot") + 0.20 * g("Ball Handle") + 0.15 * g("Shot IQ")
        + 0.10 * g("Offensive Consistency") + 0.10 * g("Agility") + 0.05 * g("Speed with Ball");
    let shot_3_od = 0.50 * g("Three-Point Shot") + 0.20 * g("Ball Handle") + 0.15 * g("Agility")
        + 0.10 * g("Speed with Ball") + 0.10 * g("Shot IQ") + 0.05 * g("Offensive Consistency");
    let shot_touch = 0.30 * g("Close Shot") + 0.20 * g("Shot IQ") + 0.20 * g("Free Throw")
        + 0.15 * g("Hands") + 0.15 * g("Offensive Consistency") + 0.15 * g("Layup");

    let post_score = 0.25 * g("Post Hook") + 0.25 * g("Post Fade") + 0.20 * g("Post Control")
        + 0.10 * g("Close Shot") + 0.10 * g("Strength") + 0.10 * g("Hands");
    let post_control = 0.40 * g("Post Control") + 0.20 * g("Strength") + 0.15 * g("Hands")
        + 0.15 * g("Offensive Consistency") + 0.10 * g("Shot IQ");
    let seal_power = 0.40 * g("Strength") + 0.20 * g("Post Control") + 0.15 * g("Close Shot")
        + 0.15 * g("Hustle") + 0.10 * g("Hands");

    let drive_create = 0.30 * g("Speed with Ball") + 0.25 * g("Ball Handle") + 0.15 * g("Agility")
        + 0.10 * g("Layup") + 0.10 * g("Shot IQ") + 0.10 * g("Offensive Consistency") + 0.10 * g("Strength");
    let handle_safe = 0.45 * g("Ball Handle") + 0.20 * g("Hands") + 0.15 * g("Agility")
        + 0.10 * g("Strength") + 0.10 * g("Offensive Consistency") + 0.10 * g("Pass IQ");
    let first_step = 0.35 * g("Speed") + 0.25 * g("Agility") + 0.15 * g("Speed with Ball")
        + 0.15 * g("Vertical") + 0.10 * g("Ball Handle") + 0.10 * g("Stamina");

    let pass_safe = 0.35 * g("Pass Accuracy") + 0.25 * g("Pass IQ") + 0.20 * g("Hands") + 0.20 * g("Pass Vision");
    let pass_create = 0.30 * g("Pass Vision") + 0.25 * g("Pass Accuracy") + 0.20 * g("Pass IQ")
        + 0.10 * g("Ball Handle") + 0.10 * g("Shot IQ");
    let pnr_read = 0.35 * g("Pass IQ") + 0.25 * g("Shot IQ") + 0.20 * g("Pass Vision")
        + 0.10 * g("Ball Handle") + 0.10 * g("Offensive Consistency");
    let shortroll_play = 0.35 * g("Pass IQ") + 0.25 * g("Pass Accuracy") + 0.20 * g("Hands")
        + 0.10 * g("Pass Vision") + 0.10 * g("Close Shot");

    let def_poa = 0.40 * g("Perimeter Defense") + 0.20 * g("Agility") + 0.15 * g("Speed")
        + 0.10 * g("Steal") + 0.10 * g("Help Defense IQ") + 0.05 * g("Defensive Consistency");
    let def_help = 0.35 * g("Help Defense IQ") + 0.20 * g("Interior Defense") + 0.15 * g("Perimeter Defense")
        + 0.10 * g("Pass Perception") + 0.10 * g("Defensive Consistency") + 0.10 * g("Hustle");
    let def_steal = 0.45 * g("Steal") + 0.20 * g("Pass Perception") + 0.15 * g("Perimeter Defense")
        + 0.10 * g("Agility") + 0.10 * g("Defensive Consistency");
    let def_rim = 0.40 * g("Block") + 0.20 * g("Interior Defense") + 0.15 * g("Vertical")
        + 0.10 * g("Strength") + 0.10 * g("Help Defense IQ") + 0.05 * g("Defensive Consistency");
    let def_post = 0.40 * g("Interior Defense") + 0.25 * g("Strength") + 0.15 * g("Block")
        + 0.10 * g("Post Control") + 0.10 * g("Defensive Consistency");

    let reb_or = 0.45 * g("Offensive Rebound") + 0.20 * g("Vertical") + 0.15 * g("Hustle")
        + 0.10 * g("Strength") + 0.10 * g("Hands");
    let reb_dr = 0.50 * g("Defensive Rebound") + 0.15 * g("Vertical") + 0.15 * g("Hustle")
        + 0.10 * g("Strength") + 0.10 * g("Hands");

    let physical = 0.45 * g("Strength") + 0.20 * g("Overall Durability") + 0.20 * g("Hustle") + 0.15 * g("Stamina");
    let endurance = 0.55 * g("Stamina") + 0.25 * g("Overall Durability") + 0.20 * g("Hustle");
    let fat_capacity = g("Stamina");

    let raw_out: [(&str, f64); 29] = [
        ("FIN_RIM", fin_rim), ("FIN_DUNK", fin_dunk), ("FIN_CONTACT", fin_contact),
        ("SHOT_MID_CS", shot_mid_cs), ("SHOT_3_CS", shot_3_cs), ("SHOT_FT", shot_ft),
        ("SHOT_MID_PU", shot_mid_pu), ("SHOT_3_OD", shot_3_od), ("SHOT_TOUCH", shot_touch),
        ("POST_SCORE", post_score), ("POST_CONTROL", post_control), ("SEAL_POWER", seal_power),
        ("DRIVE_CREATE", drive_create), ("HANDLE_SAFE", handle_safe), ("FIRST_STEP", first_step),
        ("PASS_SAFE", pass_safe), ("PASS_CREATE", pass_create), ("PNR_READ", pnr_read), ("SHORTROLL_PLAY", shortroll_play),
        ("DEF_POA", def_poa), ("DEF_HELP", def_help), ("DEF_STEAL", def_steal), ("DEF_RIM", def_rim), ("DEF_POST", def_post),
        ("REB_OR", reb_or), ("REB_DR", reb_dr), ("PHYSICAL", physical), ("ENDURANCE", endurance), ("FAT_CAPACITY", fat_capacity),
    ];

    raw_out.into_iter().map(|(k, v)| (k.to_string(), clamp100(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings_all(v: f64) -> RawRatings {
        RAW_RATING_KEYS.iter().map(|k| (k.to_string(), v)).collect()
    }

    #[test]
    fn all_outputs_present_and_clamped() {
        let derived = derive(&ratings_all(50.0));
        assert_eq!(derived.len(), DERIVED_ABILITY_KEYS.len());
        for key in DERIVED_ABILITY_KEYS {
            let v = *derived.get(*key).unwrap_or_else(|| panic!("missing {key}"));
            assert!((0.0..=100.0).contains(&v), "{key} out of range: {v}");
        }
    }

    #[test]
    fn uniform_max_ratings_saturate_to_100() {
        let derived = derive(&ratings_all(100.0));
        for key in DERIVED_ABILITY_KEYS {
            assert!((derived[*key] - 100.0).abs() < 1e-9, "{key} = {}", derived[*key]);
        }
    }

    #[test]
    fn missing_rating_defaults_to_fifty() {
        let derived = derive(&RawRatings::new());
        // every weight sums to 1 over default-50 inputs, so every output is 50,
        // except SHOT_TOUCH, whose six coefficients sum to 1.15 (ported as-is
        // from derived_formulas.py) and so lands on 57.5.
        for key in DERIVED_ABILITY_KEYS {
            let expected = if *key == "SHOT_TOUCH" { 57.5 } else { 50.0 };
            assert!((derived[*key] - expected).abs() < 1e-9, "{key} = {}", derived[*key]);
        }
    }

    #[test]
    fn three_point_shooter_beats_post_scorer_on_cs_three() {
        let mut shooter = ratings_all(50.0);
        shooter.insert("Three-Point Shot".into(), 95.0);
        shooter.insert("Shot IQ".into(), 80.0);
        let mut post = ratings_all(50.0);
        post.insert("Post Hook".into(), 95.0);

        let d_shooter = derive(&shooter);
        let d_post = derive(&post);
        assert!(d_shooter["SHOT_3_CS"] > d_post["SHOT_3_CS"]);
        assert!(d_post["POST_SCORE"] > d_shooter["POST_SCORE"]);
    }
}
