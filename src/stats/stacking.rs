//! Habit-stacking display order: habits cued on another habit are shown
//! grouped under it, one chain at a time.

use std::collections::{HashMap, HashSet};

use crate::models::{CueType, Habit};

#[derive(Debug, Clone, Copy)]
pub struct StackedHabit<'a> {
    pub habit: &'a Habit,
    /// 0 for chain roots, +1 per cue hop.
    pub depth: usize,
}

/// Arrange habits into cue chains for display.
///
/// Roots (no cue, or a cue that isn't in the list — e.g. archived) come in
/// `sort_order`. Each habit is followed by the habits stacked on it, one
/// depth deeper: `before` siblings first, then `with`, then `after`, each by
/// `sort_order`. Cue cycles can exist in the store; anything trapped in one
/// is appended flat at the end instead of being dropped.
pub fn organize_habits(habits: &[Habit]) -> Vec<StackedHabit<'_>> {
    let ids: HashSet<i64> = habits.iter().map(|h| h.id).collect();

    let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (idx, habit) in habits.iter().enumerate() {
        match habit.cue_habit_id {
            Some(cue_id) if ids.contains(&cue_id) && cue_id != habit.id => {
                children.entry(cue_id).or_default().push(idx);
            }
            _ => roots.push(idx),
        }
    }

    let by_display_order = |&a: &usize, &b: &usize| {
        let (ha, hb) = (&habits[a], &habits[b]);
        (cue_rank(ha.cue_type), ha.sort_order, ha.id).cmp(&(cue_rank(hb.cue_type), hb.sort_order, hb.id))
    };
    roots.sort_by(by_display_order);
    for siblings in children.values_mut() {
        siblings.sort_by(by_display_order);
    }

    let mut out = Vec::with_capacity(habits.len());
    let mut visited = HashSet::new();
    for root in roots {
        push_chain(habits, &children, root, 0, &mut visited, &mut out);
    }

    // Leftovers are habits whose cue edges form a cycle.
    let mut leftovers: Vec<usize> = (0..habits.len()).filter(|i| !visited.contains(i)).collect();
    leftovers.sort_by(by_display_order);
    for idx in leftovers {
        out.push(StackedHabit {
            habit: &habits[idx],
            depth: 0,
        });
    }

    out
}

fn push_chain<'a>(
    habits: &'a [Habit],
    children: &HashMap<i64, Vec<usize>>,
    idx: usize,
    depth: usize,
    visited: &mut HashSet<usize>,
    out: &mut Vec<StackedHabit<'a>>,
) {
    if !visited.insert(idx) {
        return;
    }
    out.push(StackedHabit {
        habit: &habits[idx],
        depth,
    });
    if let Some(stacked) = children.get(&habits[idx].id) {
        for &child in stacked {
            push_chain(habits, children, child, depth + 1, visited, out);
        }
    }
}

fn cue_rank(cue: Option<CueType>) -> u8 {
    match cue {
        Some(CueType::Before) => 0,
        Some(CueType::With) => 1,
        Some(CueType::After) => 2,
        None => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, TimeOfDay, TrackingType};

    fn habit(id: i64, name: &str, sort_order: i32) -> Habit {
        Habit {
            id,
            name: name.to_string(),
            description: None,
            icon: None,
            color: None,
            tracking_type: TrackingType::Boolean,
            target_value: None,
            target_unit: None,
            frequency: Frequency::Daily,
            frequency_days: None,
            time_of_day: TimeOfDay::Anytime,
            cue_habit_id: None,
            cue_type: None,
            archived: false,
            sort_order,
            created_at: String::new(),
        }
    }

    fn cued(id: i64, name: &str, sort_order: i32, cue: i64, cue_type: CueType) -> Habit {
        Habit {
            cue_habit_id: Some(cue),
            cue_type: Some(cue_type),
            ..habit(id, name, sort_order)
        }
    }

    fn names<'a>(stacked: &'a [StackedHabit<'a>]) -> Vec<(&'a str, usize)> {
        stacked
            .iter()
            .map(|s| (s.habit.name.as_str(), s.depth))
            .collect()
    }

    #[test]
    fn flat_list_keeps_sort_order() {
        let habits = vec![habit(1, "read", 2), habit(2, "run", 0), habit(3, "water", 1)];
        assert_eq!(
            names(&organize_habits(&habits)),
            vec![("run", 0), ("water", 0), ("read", 0)]
        );
    }

    #[test]
    fn stacked_habits_follow_their_cue() {
        let habits = vec![
            habit(1, "coffee", 0),
            habit(2, "run", 1),
            cued(3, "meditate", 0, 1, CueType::After),
            cued(4, "journal", 1, 3, CueType::After),
        ];
        assert_eq!(
            names(&organize_habits(&habits)),
            vec![
                ("coffee", 0),
                ("meditate", 1),
                ("journal", 2),
                ("run", 0)
            ]
        );
    }

    #[test]
    fn before_sorts_ahead_of_with_and_after() {
        let habits = vec![
            habit(1, "lunch", 0),
            cued(2, "walk", 0, 1, CueType::After),
            cued(3, "vitamins", 0, 1, CueType::With),
            cued(4, "stretch", 0, 1, CueType::Before),
        ];
        assert_eq!(
            names(&organize_habits(&habits)),
            vec![("lunch", 0), ("stretch", 1), ("vitamins", 1), ("walk", 1)]
        );
    }

    #[test]
    fn missing_cue_falls_back_to_root() {
        let habits = vec![cued(1, "floss", 0, 99, CueType::After)];
        assert_eq!(names(&organize_habits(&habits)), vec![("floss", 0)]);
    }

    #[test]
    fn cycles_do_not_drop_habits() {
        let habits = vec![
            cued(1, "a", 0, 2, CueType::After),
            cued(2, "b", 1, 1, CueType::After),
            habit(3, "c", 2),
        ];
        let stacked = organize_habits(&habits);
        assert_eq!(stacked.len(), 3);
        let mut seen: Vec<&str> = stacked.iter().map(|s| s.habit.name.as_str()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b", "c"]);
    }
}
