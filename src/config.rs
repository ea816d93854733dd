use crate::err::PipeErr;
use crate::input::Input;
use crate::op::Op;
use crate::output::Output;
use crate::parse;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

/// 覆盖日志过滤规则的环境变量，语法同`tracing_subscriber::EnvFilter`
pub(crate) const LOG_ENV: &str = "KVP_LOG";

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Config {
    /// -V,--version    打印版本信息。
    Version,
    /// -h,--help       打印帮助信息。
    Help,
    /// -v,--verbose    执行之前打印流水线详情，并输出调试日志。
    Verbose,
    /// -d,--dry-run    仅解析并构造流水线，不执行。
    DryRun,
    /// -n,--nocase     全局忽略大小写。
    Nocase,
    /// -e,--eval       以Token模式解析下一个参数。
    Eval,
}

#[inline]
pub(crate) fn is_nocase(nocase: bool, configs: &[Config]) -> bool {
    nocase || configs.contains(&Config::Nocase)
}

/// 初始化日志，输出到标准错误。重复初始化时静默忽略。
pub(crate) fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "kvpipe=debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

pub(crate) fn print_pipe_info(input: &Input, ops: &[Op], output: &Output) {
    println!("Input:");
    println!("    {:?}", input);
    println!("Op:");
    println!("{}", ops.iter().map(|op| format!("    {:?}", op)).join("\n"));
    println!("Output:");
    println!("    {:?}", output);
}

/// 将下一个参数拆分为多个参数后解析，其余参数被忽略。
pub(crate) fn parse_eval_token(
    args: &mut impl Iterator<Item = String>,
) -> Result<(Input, Vec<Op>, Output), PipeErr> {
    if let Some(token) = args.next() {
        let split = parse::token::split_args(&token)?;
        parse::args::parse(split.into_iter().peekable())
    } else {
        Err(PipeErr::MissingArg { cmd: "--eval", arg: "token" })?
    }
}
