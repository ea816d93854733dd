use crate::err::PipeErr;
use crate::input::Input;
use crate::op::Op;
use crate::output::Output;
use crate::parse::args::input::parse_input;
use crate::parse::args::op::parse_ops;
use crate::parse::args::output::parse_output;
use std::iter::Peekable;
use std::str::FromStr;

mod condition;
mod config;
mod input;
mod op;
mod output;

pub(crate) use config::parse_configs;

pub(crate) fn parse(mut args: Peekable<impl Iterator<Item = String>>) -> Result<(Input, Vec<Op>, Output), PipeErr> {
    let input = parse_input(&mut args)?;
    let ops = parse_ops(&mut args)?;
    let output = parse_output(&mut args)?;
    let remaining = args.collect::<Vec<_>>();
    if !remaining.is_empty() { Err(PipeErr::UnknownArgs { args: remaining }) } else { Ok((input, ops, output)) }
}

/// 以单个`:`开头的参数为操作命令，`::`开头的参数为转义后的普通参数。
fn is_op_cmd(arg: &str) -> bool {
    arg.starts_with(':') && !arg.starts_with("::")
}

/// 解析一个可选的普通参数，遇到操作命令时不消耗。
fn parse_opt_arg(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<String> {
    if let Some(value) = args.peek()
        && !is_op_cmd(value)
    {
        parse_arg(args)
    } else {
        None
    }
}

/// 解析一个必选参数，处理转义
fn parse_arg(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<String> {
    args.next().map(unescape)
}

fn unescape(arg: String) -> String {
    match arg.as_str() {
        "\\[" => "[".to_string(),
        "\\]" => "]".to_string(),
        _ => {
            if let Some(stripped) = arg.strip_prefix("::") {
                format!(":{}", stripped)
            } else {
                arg
            }
        }
    }
}

/// 解析`<arg>`或者`[ <arg>[ ...] ]`，至少需要一个参数。
fn parse_arg_or_args1(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str, arg: &'static str,
) -> Result<Vec<String>, PipeErr> {
    match args.next() {
        Some(value) if value == "[" => {
            let mut values = Vec::new();
            loop {
                match args.next() {
                    Some(value) if value == "]" => break,
                    Some(value) => values.push(unescape(value)),
                    None => Err(PipeErr::MissingArg { cmd, arg: "]" })?,
                }
            }
            if values.is_empty() { Err(PipeErr::MissingArg { cmd, arg }) } else { Ok(values) }
        }
        Some(value) if value == "]" => Err(PipeErr::BadArg { cmd, arg, arg_value: value }),
        Some(value) => Ok(vec![unescape(value)]),
        None => Err(PipeErr::MissingArg { cmd, arg }),
    }
}

fn parse_tag_nocase(args: &mut Peekable<impl Iterator<Item = String>>, tag: &'static str) -> bool {
    if let Some(value) = args.peek()
        && value.eq_ignore_ascii_case(tag)
    {
        args.next();
        true
    } else {
        false
    }
}

fn parse_positive_usize(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<usize> {
    let parsed = args.peek().and_then(|value| value.parse::<usize>().ok()).filter(|u| *u > 0);
    if parsed.is_some() {
        args.next();
    }
    parsed
}

/// 下一个参数能够解析为`T`时消耗并返回，否则不消耗。
fn parse_as<T: FromStr>(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<T> {
    let parsed = args.peek().and_then(|value| value.parse::<T>().ok());
    if parsed.is_some() {
        args.next();
    }
    parsed
}

/// 解析可选的换行符参数`lf|crlf`
fn parse_line_ending(args: &mut Peekable<impl Iterator<Item = String>>) -> Option<bool> {
    if parse_tag_nocase(args, "crlf") {
        Some(true)
    } else if parse_tag_nocase(args, "lf") {
        Some(false)
    } else {
        None
    }
}

/// 解析一般的文件信息`<file>[ append][ lf|crlf]`
fn parse_general_file_info(
    args: &mut Peekable<impl Iterator<Item = String>>,
) -> Option<(String, bool, Option<bool>)> {
    let file = parse_opt_arg(args)?;
    let append = parse_tag_nocase(args, "append");
    let crlf = parse_line_ending(args);
    Some((file, append, crlf))
}

#[cfg(test)]
fn build_args(args_line: &str) -> Peekable<std::vec::IntoIter<String>> {
    crate::parse::token::split_args(args_line).unwrap().into_iter().peekable()
}
