use crate::err::PipeErr;
use crate::key::Key;
use crate::Integer;
use rt_format::argument::NamedArguments;
use rt_format::{Format, FormatArgument, NoPositionalArguments, ParsedFormat, Specifier};
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub(crate) enum FmtArg {
    String(String),
    Integer(Integer),
}

impl FmtArg {
    /// 能够无损往返的整数文本按照整数格式化，其余按照字符串格式化
    fn from_text(text: &str) -> FmtArg {
        match text.parse::<Integer>() {
            Ok(integer) if integer.to_string() == text => FmtArg::Integer(integer),
            _ => FmtArg::String(text.to_owned()),
        }
    }
}

impl From<&Key> for FmtArg {
    fn from(key: &Key) -> Self {
        match key {
            Key::Integer(integer) => FmtArg::Integer(*integer),
            Key::String(string) => FmtArg::String(string.clone()),
        }
    }
}

impl FormatArgument for FmtArg {
    fn supports_format(&self, specifier: &Specifier) -> bool {
        match self {
            FmtArg::String(_) => matches!(specifier.format, Format::Display | Format::Debug),
            FmtArg::Integer(_) => true,
        }
    }

    fn fmt_display(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            FmtArg::String(string) => std::fmt::Display::fmt(string, f),
            FmtArg::Integer(integer) => std::fmt::Display::fmt(integer, f),
        }
    }

    fn fmt_debug(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            FmtArg::String(string) => std::fmt::Debug::fmt(string, f),
            FmtArg::Integer(integer) => std::fmt::Debug::fmt(integer, f),
        }
    }

    fn fmt_octal(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::Octal::fmt(integer, f) } else { Err(std::fmt::Error) }
    }

    fn fmt_lower_hex(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::LowerHex::fmt(integer, f) } else { Err(std::fmt::Error) }
    }

    fn fmt_upper_hex(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::UpperHex::fmt(integer, f) } else { Err(std::fmt::Error) }
    }

    fn fmt_binary(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::Binary::fmt(integer, f) } else { Err(std::fmt::Error) }
    }

    fn fmt_lower_exp(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::LowerExp::fmt(integer, f) } else { Err(std::fmt::Error) }
    }

    fn fmt_upper_exp(&self, f: &mut Formatter) -> std::fmt::Result {
        if let FmtArg::Integer(integer) = self { std::fmt::UpperExp::fmt(integer, f) } else { Err(std::fmt::Error) }
    }
}

/// 格式化时可用的具名参数：`{key}`和`{value}`
struct PairArgs {
    key: FmtArg,
    value: FmtArg,
}

impl NamedArguments<FmtArg> for PairArgs {
    fn get(&self, key: &str) -> Option<&FmtArg> {
        match key {
            "key" => Some(&self.key),
            "value" => Some(&self.value),
            _ => None,
        }
    }
}

pub(crate) fn fmt_pair(fmt: &str, key: &Key, value: &str) -> Result<String, PipeErr> {
    let args = PairArgs { key: FmtArg::from(key), value: FmtArg::from_text(value) };
    match ParsedFormat::parse(fmt, &NoPositionalArguments, &args) {
        Ok(parsed) => Ok(format!("{}", parsed)),
        Err(err_pos) => Err(PipeErr::FormatStringErr {
            fmt: format!("{fmt:?}"),
            value: format!("{{key: {key}, value: {value}}}"),
            err_pos,
        }),
    }
}
