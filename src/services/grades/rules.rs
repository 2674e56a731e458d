//! 成绩计算规则
//!
//! 分数满分 20。平均分、总评都保留两位小数。

use crate::models::grades::entities::{Decision, Grade, Ranking, SubjectAverage};
use crate::utils::round2;

/// 加权平均 Σ(分数 × 系数) / Σ系数，系数和为 0 时没有平均分
pub fn weighted_average<I>(items: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, weights) = items
        .into_iter()
        .fold((0.0, 0.0), |(sum, weights), (value, coefficient)| {
            (sum + value * coefficient, weights + coefficient)
        });
    (weights > 0.0).then(|| round2(sum / weights))
}

/// 单科成绩的加权平均
pub fn grade_average(grades: &[Grade]) -> Option<f64> {
    weighted_average(grades.iter().map(|g| (g.value, g.coefficient)))
}

/// 各科平均分的算术平均，用于班级排名
pub fn general_average(averages: &[SubjectAverage]) -> Option<f64> {
    if averages.is_empty() {
        return None;
    }
    let sum: f64 = averages.iter().map(|a| a.value).sum();
    Some(round2(sum / averages.len() as f64))
}

/// 按科目系数加权的总评，用于成绩单
pub fn weighted_general_average(averages: &[SubjectAverage]) -> Option<f64> {
    weighted_average(averages.iter().map(|a| (a.value, a.coefficient)))
}

/// 竞赛式排名：按总评降序，分数相同名次相同，下一名次跳过
pub fn competition_ranking(
    class_id: i64,
    period: &str,
    mut scores: Vec<(i64, f64)>,
) -> Vec<Ranking> {
    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut rankings: Vec<Ranking> = Vec::with_capacity(scores.len());
    for (index, (student_id, average)) in scores.into_iter().enumerate() {
        let rank = match rankings.last() {
            Some(prev) if prev.general_average == average => prev.rank,
            _ => index as i32 + 1,
        };
        rankings.push(Ranking {
            student_id,
            class_id,
            rank,
            general_average: average,
            period: period.to_string(),
        });
    }
    rankings
}

pub fn decision(general_average: f64, pass_threshold: f64) -> Decision {
    if general_average >= pass_threshold {
        Decision::Admitted
    } else {
        Decision::Failed
    }
}

/// 及格率（百分比）
pub fn pass_rate(passed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(passed as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::entities::ANNUAL_PERIOD;

    fn avg(subject_id: i64, value: f64, coefficient: f64) -> SubjectAverage {
        SubjectAverage {
            student_id: 1,
            subject_id,
            class_id: 1,
            subject_label: format!("S{subject_id}"),
            coefficient,
            value,
            period: ANNUAL_PERIOD.to_string(),
        }
    }

    #[test]
    fn test_weighted_average() {
        assert_eq!(weighted_average([(12.0, 1.0), (16.0, 3.0)]), Some(15.0));
        assert_eq!(weighted_average([(10.0, 2.0), (11.0, 1.0)]), Some(10.33));
        assert_eq!(weighted_average(Vec::<(f64, f64)>::new()), None);
        assert_eq!(weighted_average([(10.0, 0.0)]), None);
    }

    #[test]
    fn test_general_averages() {
        let averages = vec![avg(1, 14.0, 4.0), avg(2, 8.0, 1.0)];
        assert_eq!(general_average(&averages), Some(11.0));
        assert_eq!(weighted_general_average(&averages), Some(12.8));
        assert_eq!(general_average(&[]), None);
    }

    #[test]
    fn test_competition_ranking_shares_ties() {
        let rankings = competition_ranking(
            3,
            ANNUAL_PERIOD,
            vec![(10, 12.5), (11, 15.0), (12, 12.5), (13, 9.0)],
        );
        let ranks: Vec<(i64, i32)> = rankings.iter().map(|r| (r.student_id, r.rank)).collect();
        assert_eq!(ranks, vec![(11, 1), (10, 2), (12, 2), (13, 4)]);
        assert!(rankings.iter().all(|r| r.class_id == 3));
    }

    #[test]
    fn test_decision_and_pass_rate() {
        assert_eq!(decision(10.0, 10.0), Decision::Admitted);
        assert_eq!(decision(9.99, 10.0), Decision::Failed);
        assert_eq!(pass_rate(2, 3), 66.67);
        assert_eq!(pass_rate(0, 0), 0.0);
    }
}
