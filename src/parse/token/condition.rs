use crate::parse::token::ParserError;
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::char;
use nom::combinator::{all_consuming, map, opt, value, verify};
use nom::error::context;
use nom::{IResult, Parser};

/// 范围参数：`[!][<min>],[<max>]`，两端至少指定一个。
///
/// 返回`(是否取反, 最小值, 最大值)`。
pub(crate) fn cond_range<'a, T, F>(
    bound: F,
) -> impl Parser<&'a str, Output = (bool, Option<T>, Option<T>), Error = ParserError<'a>>
where
    F: Parser<&'a str, Output = T, Error = ParserError<'a>> + Clone,
{
    map(
        verify(
            all_consuming((
                opt(char('!')),
                context("[<min>]", opt(bound.clone())),
                char(','),
                context("[<max>]", opt(bound)),
            )),
            |(_, min, _, max): &(Option<char>, Option<T>, char, Option<T>)| min.is_some() || max.is_some(),
        ),
        |(not, min, _, max)| (not.is_some(), min, max),
    )
}

/// 特定值参数：`[!]=<spec>`
pub(crate) fn cond_spec<'a, T, F>(spec: F) -> impl Parser<&'a str, Output = (bool, T), Error = ParserError<'a>>
where
    F: Parser<&'a str, Output = T, Error = ParserError<'a>>,
{
    map(all_consuming((opt(char('!')), char('='), context("<spec>", spec))), |(not, _, spec)| (not.is_some(), spec))
}

/// 数值类型参数：`!`、`[!]integer`或者`[!]float`
pub(crate) fn cond_num(input: &str) -> IResult<&str, (bool, Option<bool>), ParserError<'_>> {
    map(
        verify(
            all_consuming((
                opt(char('!')),
                opt(alt((value(true, tag_no_case("integer")), value(false, tag_no_case("float"))))),
            )),
            |(not, integer): &(Option<char>, Option<bool>)| not.is_some() || integer.is_some(),
        ),
        |(not, integer)| (not.is_some(), integer),
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::token::parse_num;
    use crate::Num;
    use nom::character::complete::{i64, usize};

    #[test]
    fn test_cond_range() {
        assert_eq!(cond_range(usize).parse("1,3"), Ok(("", (false, Some(1), Some(3)))));
        assert_eq!(cond_range(usize).parse(",3"), Ok(("", (false, None, Some(3)))));
        assert_eq!(cond_range(usize).parse("!1,"), Ok(("", (true, Some(1), None))));
        assert!(cond_range(usize).parse(",").is_err());
        assert!(cond_range(usize).parse("!,").is_err());
        assert!(cond_range(usize).parse("1.2,3").is_err());
        assert!(cond_range(usize).parse("1,3x").is_err());
        assert_eq!(cond_range(i64).parse("-2,-1"), Ok(("", (false, Some(-2), Some(-1)))));
        assert_eq!(
            cond_range(parse_num).parse("!1.5,3"),
            Ok(("", (true, Some(Num::from(1.5)), Some(Num::from(3)))))
        );
    }

    #[test]
    fn test_cond_spec() {
        assert_eq!(cond_spec(usize).parse("=3"), Ok(("", (false, 3))));
        assert_eq!(cond_spec(usize).parse("!=3"), Ok(("", (true, 3))));
        assert_eq!(cond_spec(parse_num).parse("=-0.5"), Ok(("", (false, Num::from(-0.5)))));
        assert!(cond_spec(usize).parse("3").is_err());
        assert!(cond_spec(usize).parse("=").is_err());
    }

    #[test]
    fn test_cond_num() {
        assert_eq!(cond_num("integer"), Ok(("", (false, Some(true)))));
        assert_eq!(cond_num("!FLOAT"), Ok(("", (true, Some(false)))));
        assert_eq!(cond_num("!"), Ok(("", (true, None))));
        assert!(cond_num("").is_err());
        assert!(cond_num("1,2").is_err());
    }
}
