use crate::token::Loc;

/// 构造阶段 (读入文法, 变换文法, 建表) 的错误, 全部是致命的:
/// 建表冲突被检测到之后不会产出任何残缺的分析表.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("Error parsing productions, line: {line}, cause: {cause:?}.")]
    ParseProductionError {
        line: usize,
        cause: ParseProductionError,
    },
    #[error("Grammar is not LL(1), conflict detected for ({variable}, {terminal}).")]
    NotLl1 { variable: String, terminal: String },
    #[error("Variable {0} derives itself through a unit cycle, cannot remove left recursion.")]
    UnitDerivationCycle(String),
    #[error("Common prefix of factored alternatives is empty, this should not present.")]
    EmptyCommonPrefix,
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ParseProductionError {
    #[error("No arrow in production line")]
    NoArrow,
    #[error("Start symbol not found")]
    StartSymbolNotFound,
}

impl Error {
    pub(crate) fn parse_production_error(line: usize, cause: ParseProductionError) -> Self {
        Self::ParseProductionError { line, cause }
    }
}

/// 分析阶段的错误.
///
/// [`ParseError::UnexpectedTerminal`] 和 [`ParseError::NoProduction`] 是可以恢复的:
/// 调用方可以记录错误并继续喂入后续终结符, 出错的那个输入终结符相当于被跳过.
/// [`ParseError::AlreadyCompleted`] 是使用错误, 该分析器实例不能再被使用.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected}, found {found}{}.", fmt_loc(.loc))]
    UnexpectedTerminal {
        expected: String,
        found: String,
        loc: Option<Loc>,
    },
    #[error("No production for {variable} on seeing {terminal}{}.", fmt_loc(.loc))]
    NoProduction {
        variable: String,
        terminal: String,
        loc: Option<Loc>,
    },
    #[error("Parsing already completed.")]
    AlreadyCompleted,
}

impl ParseError {
    /// 是否可以通过继续喂入后续终结符来恢复.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AlreadyCompleted)
    }

    #[must_use]
    pub fn loc(&self) -> Option<Loc> {
        match self {
            Self::UnexpectedTerminal { loc, .. } | Self::NoProduction { loc, .. } => *loc,
            Self::AlreadyCompleted => None,
        }
    }
}

fn fmt_loc(loc: &Option<Loc>) -> String {
    match loc {
        Some(loc) => format!(" at {loc}"),
        None => String::new(),
    }
}
