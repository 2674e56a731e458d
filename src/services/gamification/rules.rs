//! 积分、徽章、等级和挑战规则

use crate::models::gamification::responses::{Badge, Challenge, LeaderboardEntry, PlayerLevel};

/// 计为"好成绩"的最低分
pub const GOOD_GRADE: f64 = 15.0;
pub const POINTS_PER_GOOD_GRADE: i64 = 10;
pub const ASSIDUITY_BONUS: i64 = 50;
pub const FINANCE_BONUS: i64 = 30;

const LEVELS: [(i64, PlayerLevel); 4] = [
    (100, PlayerLevel::Beginner),
    (300, PlayerLevel::Intermediate),
    (600, PlayerLevel::Advanced),
    (1000, PlayerLevel::Expert),
];

/// 学生积分计算所需的事实
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentFacts {
    pub good_grades: u64,
    pub recent_absences: u64,
    pub balance: f64,
    pub annual_average: Option<f64>,
}

pub fn points(facts: &StudentFacts) -> i64 {
    let mut points = facts.good_grades as i64 * POINTS_PER_GOOD_GRADE;
    if facts.recent_absences == 0 {
        points += ASSIDUITY_BONUS;
    }
    if facts.balance <= 0.0 {
        points += FINANCE_BONUS;
    }
    points
}

pub fn badges(facts: &StudentFacts) -> Vec<Badge> {
    let mut badges = Vec::new();
    if facts.recent_absences == 0 {
        badges.push(Badge::Assiduous);
    }
    if facts.balance <= 0.0 {
        badges.push(Badge::FinanciallyExemplary);
    }
    match facts.annual_average {
        Some(avg) if avg >= 16.0 => badges.push(Badge::ExcellentStudent),
        Some(avg) if avg >= 14.0 => badges.push(Badge::GoodStudent),
        _ => {}
    }
    badges
}

/// 等级以及距离下一等级的积分
pub fn level(points: i64) -> (PlayerLevel, Option<i64>) {
    LEVELS
        .iter()
        .find(|(threshold, _)| points < *threshold)
        .map(|(threshold, level)| (*level, Some(threshold - points)))
        .unwrap_or((PlayerLevel::Master, None))
}

/// 本月挑战
pub fn challenges(good_grades_this_month: u64, absences_this_month: u64) -> Vec<Challenge> {
    const GOOD_GRADES_TARGET: i64 = 5;
    const ATTENDANCE_DAYS: i64 = 30;

    let good = good_grades_this_month as i64;
    let absences = absences_this_month as i64;
    vec![
        Challenge {
            code: "good_grades_month".to_string(),
            title: "5 good grades this month".to_string(),
            progress: good.min(GOOD_GRADES_TARGET),
            target: GOOD_GRADES_TARGET,
            completed: good >= GOOD_GRADES_TARGET,
            reward_points: 50,
        },
        Challenge {
            code: "perfect_attendance".to_string(),
            title: "Perfect attendance this month".to_string(),
            progress: (ATTENDANCE_DAYS - absences).max(0),
            target: ATTENDANCE_DAYS,
            completed: absences == 0,
            reward_points: 0,
        },
    ]
}

/// 排序后按竞赛排名编号，同分同名次
pub fn rank_entries(
    mut scored: Vec<(i64, String, f64)>,
    descending: bool,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    scored.sort_by(|a, b| {
        let ord = a.2.total_cmp(&b.2);
        let ord = if descending { ord.reverse() } else { ord };
        ord.then(a.0.cmp(&b.0))
    });

    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(limit.min(scored.len()));
    for (index, (student_id, full_name, score)) in scored.into_iter().take(limit).enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.score == score => prev.rank,
            _ => index as i32 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            student_id,
            full_name,
            score,
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_and_badges() {
        let facts = StudentFacts {
            good_grades: 3,
            recent_absences: 0,
            balance: 0.0,
            annual_average: Some(16.5),
        };
        assert_eq!(points(&facts), 30 + 50 + 30);
        assert_eq!(
            badges(&facts),
            vec![
                Badge::Assiduous,
                Badge::FinanciallyExemplary,
                Badge::ExcellentStudent
            ]
        );

        let facts = StudentFacts {
            good_grades: 1,
            recent_absences: 2,
            balance: 1500.0,
            annual_average: Some(14.0),
        };
        assert_eq!(points(&facts), 10);
        assert_eq!(badges(&facts), vec![Badge::GoodStudent]);
    }

    #[test]
    fn test_levels() {
        assert_eq!(level(0), (PlayerLevel::Beginner, Some(100)));
        assert_eq!(level(100), (PlayerLevel::Intermediate, Some(200)));
        assert_eq!(level(599), (PlayerLevel::Advanced, Some(1)));
        assert_eq!(level(999), (PlayerLevel::Expert, Some(1)));
        assert_eq!(level(1000), (PlayerLevel::Master, None));
    }

    #[test]
    fn test_challenges() {
        let list = challenges(6, 2);
        assert_eq!(list[0].progress, 5);
        assert!(list[0].completed);
        assert_eq!(list[1].progress, 28);
        assert!(!list[1].completed);
        assert!(challenges(0, 0)[1].completed);
    }

    #[test]
    fn test_rank_entries_ties_and_limit() {
        let scored = vec![
            (1, "A".to_string(), 30.0),
            (2, "B".to_string(), 50.0),
            (3, "C".to_string(), 30.0),
            (4, "D".to_string(), 10.0),
        ];
        let ranked = rank_entries(scored.clone(), true, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].student_id, 2);
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].rank, 2);

        let ascending = rank_entries(scored, false, 20);
        assert_eq!(ascending[0].student_id, 4);
        assert_eq!(ascending[3].rank, 4);
    }
}
