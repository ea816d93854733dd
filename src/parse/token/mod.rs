pub(crate) mod condition;

use crate::err::PipeErr;
use crate::Num;
use nom::branch::alt;
use nom::bytes::complete::{escaped, take_while};
use nom::character::complete::{anychar, char, none_of, space0, space1};
use nom::combinator::{all_consuming, map, map_res, opt, verify};
use nom::multi::{fold_many1, separated_list0};
use nom::number::complete::recognize_float;
use nom::sequence::delimited;
use nom::{IResult, Parser};
use nom_language::error::{convert_error, VerboseError};
use std::borrow::Cow;

/// 解析错误的类型
pub(crate) type ParserError<'a> = VerboseError<&'a str>;

/// 按照类PosixShell的规则把一行文本拆分为多个参数，参数之间以空白分隔。
pub(crate) fn split_args(line: &str) -> Result<Vec<String>, PipeErr> {
    match all_consuming(delimited(space0, separated_list0(space1, arg), space0)).parse(line) {
        Ok((_, args)) => Ok(args),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(PipeErr::ParseTokenErr(convert_error(line, err))),
        Err(nom::Err::Incomplete(_)) => Err(PipeErr::ParseTokenErr(format!("incomplete token: {line:?}"))),
    }
}

/// 解析有限的整数或浮点数
pub(crate) fn parse_num(input: &str) -> IResult<&str, Num, ParserError<'_>> {
    map_res(recognize_float, str::parse::<Num>).parse(input)
}

/// 按照类PosixShell的规则解析单个参数
///
/// *参考：* https://pubs.opengroup.org/onlinepubs/9699919799/utilities/V3_chap02.html#tag_18_02_02
fn arg(input: &str) -> IResult<&str, String, ParserError<'_>> {
    fold_many1(
        alt((
            map(normal_part, Cow::Owned),
            map(double_quota_part, Cow::Owned),
            map(single_quota_part, Cow::Borrowed),
        )),
        String::new,
        |mut acc, item: Cow<str>| {
            acc.push_str(&item);
            acc
        },
    )
    .parse(input)
}

fn normal_part(input: &str) -> IResult<&str, String, ParserError<'_>> {
    verify(
        // 引号和空白会中断解析，转义字符在后续处理，都需要排除
        escaped_trans(none_of("\\ \t\"'"), '\\', normal_escape),
        |s: &String| !s.is_empty(), // 避免外层fold_many1遇到空字符串直接失败
    )
    .parse(input)
}

fn double_quota_part(input: &str) -> IResult<&str, String, ParserError<'_>> {
    map(
        delimited(
            char('"'),
            // 双引号内部允许转义，使用opt避免遇到`""`时解析失败
            opt(escaped_trans(none_of("\\\""), '\\', normal_escape)),
            char('"'),
        ),
        Option::unwrap_or_default,
    )
    .parse(input)
}

fn single_quota_part(input: &str) -> IResult<&str, &str, ParserError<'_>> {
    delimited(char('\''), take_while(|c| c != '\''), char('\'')).parse(input)
}

fn normal_escape(c: char) -> Option<&'static str> {
    match c {
        '\\' => Some("\\"),
        ' ' => Some(" "),
        '"' => Some("\""),
        'r' => Some("\r"),
        'n' => Some("\n"),
        't' => Some("\t"),
        _ => None,
    }
}

/// 一次性识别完整片段后再替换转义字符，不在转义范围内的反斜杠原样保留。
fn escaped_trans<'a, F>(
    normal: F, control_char: char, escape: fn(char) -> Option<&'static str>,
) -> impl Parser<&'a str, Output = String, Error = ParserError<'a>>
where
    F: Parser<&'a str, Error = ParserError<'a>>,
{
    map(escaped(normal, control_char, anychar), move |s: &str| {
        let mut result = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c != control_char {
                result.push(c);
                continue;
            }
            match chars.next() {
                Some(escape_char) => match escape(escape_char) {
                    Some(replacement) => result.push_str(replacement),
                    None => {
                        result.push(control_char);
                        result.push(escape_char);
                    }
                },
                None => result.push(control_char), // 结尾的转义字符按原样保留
            }
        }
        result
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg() {
        assert_eq!(arg("''"), Ok(("", "".to_string())));
        assert_eq!(arg(r#""""#), Ok(("", "".to_string())));
        assert_eq!(arg("hello"), Ok(("", "hello".to_string())));
        assert_eq!(arg(r#""hello""#), Ok(("", "hello".to_string())));
        assert_eq!(arg(r#"'"hello"'"#), Ok(("", r#""hello""#.to_string())));
        assert_eq!(arg(r#""'hello'""#), Ok(("", "'hello'".to_string())));
        assert_eq!(arg("hello world"), Ok((" world", "hello".to_string())));
        assert_eq!(arg(r#"\\hello\ world\nhello\tworld\""#), Ok(("", "\\hello world\nhello\tworld\"".to_string())));
        assert_eq!(arg(r#"he""llo\ "world"\ a''nd\ 'greet'"#), Ok(("", "hello world and greet".to_string())));
        assert_eq!(arg(r#"\[\d"#), Ok(("", r#"\[\d"#.to_string())));
    }

    #[test]
    fn test_split_args() {
        assert_eq!(split_args(""), Ok(vec![]));
        assert_eq!(split_args("  "), Ok(vec![]));
        assert_eq!(
            split_args(r#" of [ a "b c" ] :fmt '{key}: {value}' "#),
            Ok(vec![
                "of".to_string(),
                "[".to_string(),
                "a".to_string(),
                "b c".to_string(),
                "]".to_string(),
                ":fmt".to_string(),
                "{key}: {value}".to_string(),
            ])
        );
        assert_eq!(split_args(":split ''"), Ok(vec![":split".to_string(), "".to_string()]));
        assert!(matches!(split_args(r#"of "abc"#), Err(PipeErr::ParseTokenErr(_))));
        assert!(matches!(split_args("of 'abc"), Err(PipeErr::ParseTokenErr(_))));
    }

    #[test]
    fn test_parse_num() {
        assert_eq!(parse_num("12,"), Ok((",", Num::from(12))));
        assert_eq!(parse_num("-1.5"), Ok(("", Num::from(-1.5))));
        assert_eq!(parse_num("1e3"), Ok(("", Num::from(1000.0))));
        assert!(parse_num(",3").is_err());
        assert!(parse_num("abc").is_err());
    }
}
