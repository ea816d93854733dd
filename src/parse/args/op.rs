use crate::err::PipeErr;
use crate::op::Op;
use crate::parse::args::condition::parse_cond;
use crate::parse::args::{is_op_cmd, parse_arg, parse_as, parse_opt_arg, parse_positive_usize, parse_tag_nocase};
use crate::stage::SortBy;
use crate::{Float, Num};
use std::iter::Peekable;

pub(in crate::parse::args) fn parse_ops(
    args: &mut Peekable<impl Iterator<Item = String>>,
) -> Result<Vec<Op>, PipeErr> {
    let mut ops = vec![];
    while let Some(op) = parse_op(args)? {
        ops.push(op);
    }
    Ok(ops)
}

/// 解析一个操作命令。遇到`:to`或者非命令参数时返回`None`，无法识别的命令返回错误。
fn parse_op(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Option<Op>, PipeErr> {
    let Some(op) = args.peek() else { return Ok(None) };
    if !is_op_cmd(op) {
        return Ok(None);
    }
    let lower_op = op.to_ascii_lowercase();
    Ok(Some(match lower_op.as_str() {
        ":to" => return Ok(None),
        ":take" => parse_take_drop(args, true)?,
        ":drop" => parse_take_drop(args, false)?,
        ":upper" => parse_no_arg(args, Op::Case { upper: true }),
        ":lower" => parse_no_arg(args, Op::Case { upper: false }),
        ":replace" => parse_replace(args)?,
        ":fmt" => parse_fmt(args)?,
        ":split" => parse_split(args)?,
        ":uniq" => parse_uniq(args),
        ":sort" => parse_sort(args),
        ":join" => parse_join(args),
        ":count" => parse_no_arg(args, Op::Count),
        ":renumber" => parse_no_arg(args, Op::Renumber),
        _ => Err(PipeErr::InvalidStage { name: op.to_string() })?,
    }))
}

fn parse_no_arg(args: &mut Peekable<impl Iterator<Item = String>>, op: Op) -> Op {
    args.next();
    op
}

fn parse_take_drop(args: &mut Peekable<impl Iterator<Item = String>>, take: bool) -> Result<Op, PipeErr> {
    args.next();
    Ok(Op::new_take_drop(take, parse_cond(args, if take { ":take" } else { ":drop" })?))
}

fn parse_replace(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Op, PipeErr> {
    args.next();
    // 被替换字符串和替换目标字符串都必选，直接消耗
    let from = parse_arg(args).ok_or(PipeErr::MissingArg { cmd: ":replace", arg: "from" })?;
    let to = parse_arg(args).ok_or(PipeErr::MissingArg { cmd: ":replace", arg: "to" })?;
    let count = parse_positive_usize(args);
    let nocase = parse_tag_nocase(args, "nocase");
    Ok(Op::new_replace(from, to, count, nocase))
}

fn parse_fmt(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Op, PipeErr> {
    args.next();
    Ok(Op::Fmt(parse_arg(args).ok_or(PipeErr::MissingArg { cmd: ":fmt", arg: "format" })?))
}

fn parse_split(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Op, PipeErr> {
    args.next();
    Ok(Op::Split(parse_arg(args).ok_or(PipeErr::MissingArg { cmd: ":split", arg: "delimiter" })?))
}

fn parse_uniq(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    args.next();
    Op::Uniq(parse_tag_nocase(args, "nocase"))
}

fn parse_join(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    args.next();
    let (delimiter, batch) = match parse_opt_arg(args) {
        Some(delimiter) => (delimiter, parse_positive_usize(args)),
        None => (String::new(), None),
    };
    Op::new_join(delimiter, batch)
}

fn parse_sort(args: &mut Peekable<impl Iterator<Item = String>>) -> Op {
    args.next();
    let sort_by = if parse_tag_nocase(args, "num") {
        SortBy::Num(parse_as::<Num>(args).map(|def| match def {
            Num::Integer(integer) => integer as Float,
            Num::Float(float) => float,
        }))
    } else if parse_tag_nocase(args, "nocase") {
        SortBy::Text(true)
    } else if parse_tag_nocase(args, "random") {
        SortBy::Random
    } else {
        SortBy::Text(false)
    };
    // 随机排序不支持逆序
    let desc = sort_by != SortBy::Random && parse_tag_nocase(args, "desc");
    Op::new_sort(sort_by, desc)
}
