use crate::condition::{Condition, Select, TextSelectMode};
use crate::err::PipeErr;
use crate::parse::token::condition::{cond_num, cond_range, cond_spec};
use crate::parse::token::parse_num;
use nom::character::complete::{i64, usize};
use nom::Parser;
use std::iter::Peekable;

/// 解析条件表达式，条件名称前的`!`表示对整个条件取反。
pub(in crate::parse::args) fn parse_cond(
    args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str,
) -> Result<Condition, PipeErr> {
    let Some(arg) = args.next() else { return Err(PipeErr::MissingArg { cmd, arg: "condition" }) };
    let lower_arg = arg.to_ascii_lowercase();
    let (negate, name) = match lower_arg.strip_prefix('!') {
        Some(name) => (true, name),
        None => (false, lower_arg.as_str()),
    };
    let (not, select) = match name {
        "len" => parse_len(args, cmd)?,
        "num" => parse_number(args),
        "key" => parse_key(args, cmd)?,
        "upper" => (false, Select::Text { mode: TextSelectMode::Upper }),
        "lower" => (false, Select::Text { mode: TextSelectMode::Lower }),
        "empty" => (false, Select::Text { mode: TextSelectMode::Empty }),
        "blank" => (false, Select::Text { mode: TextSelectMode::Blank }),
        "reg" => match args.next() {
            Some(regex) => (false, Select::new_reg_match(&regex)?),
            None => Err(PipeErr::MissingArg { cmd, arg: "reg regex" })?,
        },
        _ => Err(PipeErr::BadArg { cmd, arg: "condition", arg_value: arg })?,
    };
    Ok(Condition::new(select, negate != not))
}

fn parse_len(args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str) -> Result<(bool, Select), PipeErr> {
    let Some(range_or_spec) = args.next() else { return Err(PipeErr::MissingArg { cmd, arg: "len range or spec" }) };
    if let Ok((_, (not, min, max))) = cond_range(usize).parse(&range_or_spec) {
        Ok((not, Select::TextLenRange { min, max }))
    } else if let Ok((_, (not, spec))) = cond_spec(usize).parse(&range_or_spec) {
        Ok((not, Select::TextLenSpec { spec }))
    } else {
        Err(PipeErr::ArgParseErr {
            cmd,
            arg: "len range or spec",
            arg_value: range_or_spec,
            error: "can not parse as range or spec arg".to_string(),
        })
    }
}

/// 数值条件的参数可选，无法识别的下一个参数不消耗。
fn parse_number(args: &mut Peekable<impl Iterator<Item = String>>) -> (bool, Select) {
    let Some(next) = args.peek() else { return (false, Select::Num { integer: None }) };
    let parsed = if let Ok((_, (not, min, max))) = cond_range(parse_num).parse(next) {
        Some((not, Select::NumRange { min, max }))
    } else if let Ok((_, (not, spec))) = cond_spec(parse_num).parse(next) {
        Some((not, Select::NumSpec { spec }))
    } else if let Ok((_, (not, integer))) = cond_num(next) {
        Some((not, Select::Num { integer }))
    } else {
        None
    };
    match parsed {
        Some(parsed) => {
            args.next();
            parsed
        }
        None => (false, Select::Num { integer: None }),
    }
}

fn parse_key(args: &mut Peekable<impl Iterator<Item = String>>, cmd: &'static str) -> Result<(bool, Select), PipeErr> {
    let Some(range_or_spec) = args.next() else { return Err(PipeErr::MissingArg { cmd, arg: "key range or spec" }) };
    if let Ok((_, (not, min, max))) = cond_range(i64).parse(&range_or_spec) {
        Ok((not, Select::KeyRange { min, max }))
    } else if let Ok((_, (not, spec))) = cond_spec(i64).parse(&range_or_spec) {
        Ok((not, Select::KeyRange { min: Some(spec), max: Some(spec) }))
    } else {
        Err(PipeErr::ArgParseErr {
            cmd,
            arg: "key range or spec",
            arg_value: range_or_spec,
            error: "can not parse as range or spec arg".to_string(),
        })
    }
}
