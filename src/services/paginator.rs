//! 分组 - 业务能力层
//!
//! 分组只是题目序列上的投影，按需计算，不保存副本

use crate::models::question::{Question, QuestionGroup};

/// 每组题目数
pub const GROUP_SIZE: usize = 10;

/// 组数
pub fn group_count(total: usize) -> usize {
    total.div_ceil(GROUP_SIZE)
}

/// 各组的展开状态
///
/// 只记录标志位，切换时不重新切分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExpansion {
    flags: Vec<bool>,
}

impl GroupExpansion {
    /// 第一组默认展开，其余折叠
    pub fn for_total(total: usize) -> Self {
        let flags = (0..group_count(total)).map(|i| i == 0).collect();
        Self { flags }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// 切换某一组，返回切换后的状态；索引越界返回 None
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let flag = self.flags.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// 按位置切分为固定大小的组
pub fn paginate<'a>(questions: &'a [Question], expansion: &GroupExpansion) -> Vec<QuestionGroup<'a>> {
    questions
        .chunks(GROUP_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            let start_num = index * GROUP_SIZE + 1;
            QuestionGroup {
                start_num,
                end_num: start_num + chunk.len() - 1,
                questions: chunk,
                is_expanded: expansion.is_expanded(index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new("1", format!("질문 {}", i), QuestionType::SingleChoice))
            .collect()
    }

    #[test]
    fn test_twenty_three_questions() {
        let qs = questions(23);
        let groups = paginate(&qs, &GroupExpansion::for_total(qs.len()));

        let ranges: Vec<(usize, usize)> = groups.iter().map(|g| (g.start_num, g.end_num)).collect();
        assert_eq!(ranges, vec![(1, 10), (11, 20), (21, 23)]);
        assert_eq!(
            groups.iter().map(|g| g.is_expanded).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert_eq!(groups[2].len(), 3);
    }

    #[test]
    fn test_boundaries_are_multiples_of_ten() {
        for total in [1, 9, 10, 11, 20, 37] {
            let qs = questions(total);
            let groups = paginate(&qs, &GroupExpansion::for_total(total));
            let (last, rest) = groups.split_last().unwrap();
            for group in rest {
                assert_eq!(group.end_num % GROUP_SIZE, 0);
            }
            assert_eq!(last.end_num, total);
        }
    }

    #[test]
    fn test_ranges_ignore_source_numbers() {
        let mut qs = questions(2);
        qs[0].number = "5".to_string();
        qs[1].number = "5-1".to_string();
        let groups = paginate(&qs, &GroupExpansion::for_total(2));
        assert_eq!((groups[0].start_num, groups[0].end_num), (1, 2));
    }

    #[test]
    fn test_toggle_flips_only_one_group() {
        let mut expansion = GroupExpansion::for_total(23);
        assert_eq!(expansion.toggle(1), Some(true));
        assert!(expansion.is_expanded(0));
        assert!(expansion.is_expanded(1));
        assert!(!expansion.is_expanded(2));
        assert_eq!(expansion.toggle(0), Some(false));
        assert_eq!(expansion.toggle(3), None);
    }

    #[test]
    fn test_empty_sequence_has_no_groups() {
        let expansion = GroupExpansion::for_total(0);
        assert!(expansion.is_empty());
        assert!(paginate(&[], &expansion).is_empty());
    }
}
