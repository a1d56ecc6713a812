use serde::Serialize;

/// Awarded for any task id missing from [`TASK_REWARDS`].
pub const DEFAULT_TASK_REWARD: i64 = 50;

/// Task id to point value, covering the task-center missions and the
/// backend's daily-quest pool.
pub const TASK_REWARDS: [(&str, i64); 9] = [
    ("general", 50),
    ("gutter", 150),
    ("flowerpot", 50),
    ("T1", 50),
    ("T2", 40),
    ("T3", 60),
    ("T4", 25),
    ("T5", 20),
    ("T6", 10),
];

pub fn reward_for(task_id: &str) -> i64 {
    TASK_REWARDS
        .iter()
        .find(|(id, _)| *id == task_id)
        .map_or(DEFAULT_TASK_REWARD, |(_, points)| *points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mission {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl Mission {
    pub fn reward(&self) -> i64 {
        reward_for(self.id)
    }
}

pub const MISSIONS: [Mission; 3] = [
    Mission {
        id: "general",
        title: "General Check",
        description: "Look around your home for standing water and snap a photo.",
    },
    Mission {
        id: "gutter",
        title: "Clean Roof Gutters",
        description: "Prevent water stagnation where mosquitoes can breed. \
                      Help protect 4 neighboring homes.",
    },
    Mission {
        id: "flowerpot",
        title: "Flower Pot Inspection",
        description: "A quick check for larvae in 3 outdoor containers. Takes only 5 minutes!",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids() {
        assert_eq!(reward_for("gutter"), 150);
        assert_eq!(reward_for("flowerpot"), 50);
        assert_eq!(reward_for("T3"), 60);
        assert_eq!(reward_for("T6"), 10);
    }

    #[test]
    fn unknown_ids_fall_back_to_default() {
        assert_eq!(reward_for("mystery"), DEFAULT_TASK_REWARD);
        assert_eq!(reward_for(""), DEFAULT_TASK_REWARD);
        assert_eq!(reward_for("t1"), DEFAULT_TASK_REWARD);
    }

    #[test]
    fn missions_use_table() {
        let rewards: Vec<i64> = MISSIONS.iter().map(Mission::reward).collect();
        assert_eq!(rewards, vec![50, 150, 50]);
    }
}
