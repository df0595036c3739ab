//! Badge catalog and the pure stats → earned-badges mapping.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Streak,
    Completion,
    Consistency,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: Category,
    pub requirement: u32,
    pub tier: Tier,
}

pub const CATALOG: &[Achievement] = &[
    // Streak badges
    Achievement {
        id: "streak_7",
        name: "Week Warrior",
        description: "Maintain a 7-day streak",
        icon: "🔥",
        category: Category::Streak,
        requirement: 7,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "streak_14",
        name: "Fortnight Fighter",
        description: "Maintain a 14-day streak",
        icon: "🔥",
        category: Category::Streak,
        requirement: 14,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "streak_30",
        name: "Monthly Master",
        description: "Maintain a 30-day streak",
        icon: "⚡",
        category: Category::Streak,
        requirement: 30,
        tier: Tier::Silver,
    },
    Achievement {
        id: "streak_60",
        name: "Two Month Titan",
        description: "Maintain a 60-day streak",
        icon: "⚡",
        category: Category::Streak,
        requirement: 60,
        tier: Tier::Silver,
    },
    Achievement {
        id: "streak_90",
        name: "Quarter Champion",
        description: "Maintain a 90-day streak",
        icon: "👑",
        category: Category::Streak,
        requirement: 90,
        tier: Tier::Gold,
    },
    Achievement {
        id: "streak_180",
        name: "Half Year Hero",
        description: "Maintain a 180-day streak",
        icon: "👑",
        category: Category::Streak,
        requirement: 180,
        tier: Tier::Gold,
    },
    Achievement {
        id: "streak_365",
        name: "Year Legend",
        description: "Maintain a 365-day streak",
        icon: "💎",
        category: Category::Streak,
        requirement: 365,
        tier: Tier::Platinum,
    },
    // Completion badges
    Achievement {
        id: "complete_10",
        name: "Getting Started",
        description: "Complete 10 habit check-ins",
        icon: "✓",
        category: Category::Completion,
        requirement: 10,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "complete_50",
        name: "Building Momentum",
        description: "Complete 50 habit check-ins",
        icon: "✓",
        category: Category::Completion,
        requirement: 50,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "complete_100",
        name: "Century Club",
        description: "Complete 100 habit check-ins",
        icon: "💯",
        category: Category::Completion,
        requirement: 100,
        tier: Tier::Silver,
    },
    Achievement {
        id: "complete_500",
        name: "Habit Machine",
        description: "Complete 500 habit check-ins",
        icon: "🚀",
        category: Category::Completion,
        requirement: 500,
        tier: Tier::Gold,
    },
    Achievement {
        id: "complete_1000",
        name: "Thousand Strong",
        description: "Complete 1,000 habit check-ins",
        icon: "⭐",
        category: Category::Completion,
        requirement: 1000,
        tier: Tier::Platinum,
    },
    // Consistency badges
    Achievement {
        id: "perfect_week",
        name: "Perfect Week",
        description: "Complete all habits for 7 days straight",
        icon: "🎯",
        category: Category::Consistency,
        requirement: 7,
        tier: Tier::Silver,
    },
    Achievement {
        id: "perfect_month",
        name: "Perfect Month",
        description: "Complete all habits for 30 days straight",
        icon: "🏆",
        category: Category::Consistency,
        requirement: 30,
        tier: Tier::Gold,
    },
    // Special badges
    Achievement {
        id: "early_bird",
        name: "Early Bird",
        description: "Complete a habit before 7am",
        icon: "🌅",
        category: Category::Special,
        requirement: 1,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "night_owl",
        name: "Night Owl",
        description: "Complete a habit after 10pm",
        icon: "🦉",
        category: Category::Special,
        requirement: 1,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "habit_creator",
        name: "Habit Architect",
        description: "Create 5 different habits",
        icon: "🏗",
        category: Category::Special,
        requirement: 5,
        tier: Tier::Bronze,
    },
    Achievement {
        id: "habit_master",
        name: "Habit Master",
        description: "Create 10 different habits",
        icon: "🎨",
        category: Category::Special,
        requirement: 10,
        tier: Tier::Silver,
    },
];

/// Summary stats achievements are judged against.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UserStats {
    pub total_completions: u32,
    pub best_streak: u32,
    pub current_streak: u32,
    pub perfect_days: u32,
    pub habits_created: u32,
    pub has_early_completion: bool,
    pub has_late_completion: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EarnedAchievement {
    #[serde(flatten)]
    pub achievement: Achievement,
    /// 0–100, capped.
    pub progress: u32,
    pub earned: bool,
}

/// Map summary stats onto the fixed catalog.
pub fn calculate_achievements(stats: &UserStats) -> Vec<EarnedAchievement> {
    CATALOG
        .iter()
        .map(|a| {
            let metric = match a.category {
                Category::Streak => stats.best_streak,
                Category::Completion => stats.total_completions,
                Category::Consistency => stats.perfect_days,
                Category::Special => match a.id {
                    "early_bird" => stats.has_early_completion as u32,
                    "night_owl" => stats.has_late_completion as u32,
                    _ => stats.habits_created,
                },
            };
            EarnedAchievement {
                achievement: *a,
                progress: progress_percent(metric, a.requirement),
                earned: metric >= a.requirement,
            }
        })
        .collect()
}

fn progress_percent(metric: u32, requirement: u32) -> u32 {
    if requirement == 0 {
        return 100;
    }
    (((metric as f64 / requirement as f64) * 100.0).round() as u32).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(earned: &'a [EarnedAchievement], id: &str) -> &'a EarnedAchievement {
        earned
            .iter()
            .find(|e| e.achievement.id == id)
            .expect("badge in catalog")
    }

    #[test]
    fn fresh_user_earns_nothing() {
        let earned = calculate_achievements(&UserStats::default());
        assert_eq!(earned.len(), CATALOG.len());
        assert!(earned.iter().all(|e| !e.earned && e.progress == 0));
    }

    #[test]
    fn streak_badges_use_best_streak() {
        let stats = UserStats {
            best_streak: 30,
            current_streak: 2,
            ..Default::default()
        };
        let earned = calculate_achievements(&stats);
        assert!(find(&earned, "streak_30").earned);
        assert!(!find(&earned, "streak_60").earned);
        assert_eq!(find(&earned, "streak_60").progress, 50);
    }

    #[test]
    fn progress_is_capped_at_100() {
        let stats = UserStats {
            total_completions: 40,
            ..Default::default()
        };
        let earned = calculate_achievements(&stats);
        let started = find(&earned, "complete_10");
        assert!(started.earned);
        assert_eq!(started.progress, 100);
        assert_eq!(find(&earned, "complete_50").progress, 80);
    }

    #[test]
    fn special_badges_match_by_id() {
        let stats = UserStats {
            habits_created: 5,
            has_late_completion: true,
            ..Default::default()
        };
        let earned = calculate_achievements(&stats);
        assert!(find(&earned, "habit_creator").earned);
        assert!(!find(&earned, "habit_master").earned);
        assert!(find(&earned, "night_owl").earned);
        assert!(!find(&earned, "early_bird").earned);
    }

    #[test]
    fn perfect_days_drive_consistency() {
        let stats = UserStats {
            perfect_days: 9,
            ..Default::default()
        };
        let earned = calculate_achievements(&stats);
        assert!(find(&earned, "perfect_week").earned);
        assert_eq!(find(&earned, "perfect_month").progress, 30);
    }
}
