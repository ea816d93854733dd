//! 惰性的键值流水线。
//!
//! 数据源产生有序的`(键, 值)`数据，经过一系列阶段（[`Stage`]）逐个变换，每个阶段对每个输入可以输出零个、
//! 一个或多个数据，并在输入耗尽后输出一批尾部数据。组合阶段时不会物化中间结果，数据按需逐个拉取。
//!
//! ```
//! use kvpipe::{Key, Pipeline};
//!
//! let res = Pipeline::from_values(vec![11, 12, 13, 14]).filter(|_, v| v % 2 == 0).renumber().collect().unwrap();
//! assert_eq!(res.into_vec(), vec![(Key::from(0), 12), (Key::from(1), 14)]);
//! ```

use crate::config::Config;
use std::iter::Peekable;
use std::str::FromStr;
use tracing::info;

mod collect;
mod condition;
mod config;
mod err;
mod fmt;
mod help;
mod input;
mod iter;
mod key;
mod op;
mod output;
mod parse;
mod pipeline;
pub mod print;
pub mod stage;

pub use collect::PairMap;
pub use err::PipeErr;
pub use iter::{IterState, PairRes, PipelineIter};
pub use key::{Key, Pair};
pub use pipeline::{FnSource, OnceSource, Pipeline, Source};
pub use stage::{Callback, IntoPairs, Stage, StageRes};

pub type Integer = i64;
pub type Float = f64;

#[derive(Debug, Copy, Clone)]
pub(crate) enum Num {
    Integer(Integer),
    Float(Float),
}

impl From<Integer> for Num {
    fn from(i: Integer) -> Num {
        Num::Integer(i)
    }
}

impl From<Float> for Num {
    fn from(f: Float) -> Num {
        Num::Float(f)
    }
}

impl FromStr for Num {
    type Err = PipeErr;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(i) = s.parse::<Integer>() {
            Ok(Num::Integer(i))
        } else if let Ok(f) = s.parse::<Float>()
            && f.is_finite()
        {
            Ok(Num::Float(f))
        } else {
            Err(PipeErr::ParseNumErr(s.to_owned()))
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Num::Integer(a), Num::Integer(b)) => a.partial_cmp(b),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(b),
            (Num::Integer(a), Num::Float(b)) => (*a as Float).partial_cmp(b),
            (Num::Float(a), Num::Integer(b)) => a.partial_cmp(&(*b as Float)),
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(std::cmp::Ordering::Equal)
    }
}

pub(crate) type PipeRes = Result<Pipeline<String>, PipeErr>;

/// 解析命令行参数，构造并执行流水线。
pub fn run(mut args: Peekable<impl Iterator<Item = String>>) -> Result<(), PipeErr> {
    let configs = parse::args::parse_configs(&mut args);
    if configs.contains(&Config::Help) {
        help::print_help(args.next());
        return Ok(());
    } else if configs.contains(&Config::Version) {
        help::print_version();
        return Ok(());
    }
    let verbose = configs.contains(&Config::Verbose);
    config::init_logging(verbose);
    let (input, ops, output) =
        if configs.contains(&Config::Eval) { config::parse_eval_token(&mut args)? } else { parse::args::parse(args)? };
    if verbose {
        config::print_pipe_info(&input, &ops, &output);
    }
    let mut pipe = input.into_pipeline();
    for op in ops {
        pipe = op.wrap(pipe, &configs)?;
    }
    info!(stages = ?pipe.stage_names(), "pipeline built");
    if configs.contains(&Config::DryRun) { Ok(()) } else { output.handle(&pipe) }
}
