//! 机动的变体标签与生命周期阶段

use std::fmt;

/// 机动变体
///
/// 构造时确定，生命周期内不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManeuverVariant {
    /// 纵向机动（沿路径的速度整形：保持、加速、减速）
    Longitudinal,
    /// 横向机动（换道）
    Lateral,
}

impl fmt::Display for ManeuverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManeuverVariant::Longitudinal => write!(f, "longitudinal"),
            ManeuverVariant::Lateral => write!(f, "lateral"),
        }
    }
}

/// 生命周期阶段
///
/// ```text
/// Unplanned --plan--> Planned --execute--> Executing --execute(true)--> Complete
///                        \________________execute(true)_________________/
/// ```
///
/// 没有任何转换可以离开 `Complete`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// 已创建，尚未规划
    #[default]
    Unplanned,
    /// 已规划，尚未执行任何一步
    Planned,
    /// 执行中
    Executing,
    /// 已完成（终态）
    Complete,
}

impl Phase {
    /// 是否可以执行下一步
    pub fn is_executable(self) -> bool {
        matches!(self, Phase::Planned | Phase::Executing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Unplanned => "unplanned",
            Phase::Planned => "planned",
            Phase::Executing => "executing",
            Phase::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}
