use crate::commands::CmdResult;
use crate::model::Language;
use crate::spread;

pub fn run(language: Language) -> CmdResult {
    CmdResult::default().with_spreads(spread::catalog(language))
}
