use crate::err::PipeErr;
use crate::input::Input;
use crate::parse::args::parse_arg_or_args1;
use std::iter::Peekable;

/// 解析数据输入命令，未指定时默认从标准输入读取。
pub(in crate::parse::args) fn parse_input(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Input, PipeErr> {
    let Some(cmd) = args.peek() else { return Ok(Input::new_std_in()) };
    if cmd.eq_ignore_ascii_case("in") {
        args.next(); // 消耗`in`
        Ok(Input::new_std_in())
    } else if cmd.eq_ignore_ascii_case("file") {
        args.next(); // 消耗`file`
        Ok(Input::new_file(parse_arg_or_args1(args, "file", "file_name")?))
    } else if cmd.eq_ignore_ascii_case("of") {
        args.next(); // 消耗`of`
        Ok(Input::new_of(parse_arg_or_args1(args, "of", "value")?))
    } else {
        Ok(Input::new_std_in())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::args::build_args;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(&mut build_args("")), Ok(Input::new_std_in()));
        assert_eq!(parse_input(&mut build_args("IN")), Ok(Input::new_std_in()));
        let mut args = build_args(":upper");
        assert_eq!(parse_input(&mut args), Ok(Input::new_std_in()));
        assert_eq!(args.next(), Some(":upper".to_string()));
        assert_eq!(parse_input(&mut build_args("file a.txt")), Ok(Input::new_file(vec!["a.txt".to_string()])));
        assert_eq!(
            parse_input(&mut build_args("of [ 1 '2 3' ]")),
            Ok(Input::new_of(vec!["1".to_string(), "2 3".to_string()]))
        );
        assert_eq!(parse_input(&mut build_args("of")), Err(PipeErr::MissingArg { cmd: "of", arg: "value" }));
    }
}
