use crate::err::PipeErr;
use crate::output::Output;
use crate::parse::args::{parse_general_file_info, parse_tag_nocase};
use std::iter::Peekable;

pub(in crate::parse::args) fn parse_output(
    args: &mut Peekable<impl Iterator<Item = String>>,
) -> Result<Output, PipeErr> {
    if let Some(to_cmd) = args.peek()
        && to_cmd.eq_ignore_ascii_case(":to")
    {
        args.next(); // 消耗`:to`
        if parse_tag_nocase(args, "file") {
            parse_file(args)
        } else {
            parse_tag_nocase(args, "out");
            Ok(Output::new_std_out(parse_tag_nocase(args, "kv")))
        }
    } else {
        Ok(Output::new_std_out(false))
    }
}

fn parse_file(args: &mut Peekable<impl Iterator<Item = String>>) -> Result<Output, PipeErr> {
    if let Some((file, append, crlf)) = parse_general_file_info(args) {
        Ok(Output::new_file(file, append, crlf, parse_tag_nocase(args, "kv")))
    } else {
        Err(PipeErr::MissingArg { cmd: ":to file", arg: "file" })
    }
}
