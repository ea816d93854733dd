use crate::config::LOG_ENV;
use crate::err::PipeErr;

const OPTIONS_HELP: &[&str] = &[
    "-V,--version    打印版本信息。",
    "-h,--help       打印帮助信息。
                -h|--help[ options|input|op|output|fmt|cond|code]
                    未指定则打印全部帮助信息。",
    "-v,--verbose    执行之前打印流水线详情，并输出调试日志。",
    "-d,--dry-run    仅解析并构造流水线，不执行。",
    "-n,--nocase     全局忽略大小写，对:replace、:uniq和:sort生效。",
    "-e,--eval       以Token模式解析下一个参数，其他参数会被忽略。
                -e|--eval <token>
                例如：
                    -e 'of [ a b ] :upper :to out kv'",
];

const INPUT_HELP: &[&str] = &[
    "in         从标准输入读取数据，每行一个值，键为行序号。
           未指定输入命令时的默认输入，只能遍历一次。",
    "file       从文件读取数据，每行一个值，键为跨文件连续的行序号。
           file <file_name>|[ <file_name>[ ...] ]
           例如：
               file a.txt
               file [ a.txt b.txt ]",
    "of         直接指定值，键为值的序号。
           of <value>|[ <value>[ ...] ]
           例如：
               of hello
               of [ hello world ]",
];

const OP_HELP: &[&str] = &[
    ":take      保留满足条件的数据，键不变。
           :take <condition>
               <condition> 条件表达式，参考`-h cond`。",
    ":drop      丢弃满足条件的数据，键不变。
           :drop <condition>",
    ":upper     转为ASCII大写。",
    ":lower     转为ASCII小写。",
    ":replace   替换子串。
           :replace <from> <to>[ <count>][ nocase]
               <count> 替换次数，必须为正整数，可选，未指定则替换所有。
               nocase  替换时忽略大小写，可选。",
    ":fmt       格式化，参考`-h fmt`。
           :fmt <format>",
    ":split     按照分隔符拆分为多个数据，键为`<原键>.<序号>`。
           :split <delimiter>
               <delimiter> 分隔符，为空时按字符拆分。",
    ":uniq      去重，保留首次出现的数据。
           :uniq[ nocase]",
    ":sort      排序，键随值一起移动。
           :sort[ num[ <default>]| nocase| random][ desc]
               num         按照数值排序，无法解析的按照<default>排序，未指定时按照最大值处理。
               nocase      按照字典序排序时忽略大小写。
               random      随机排序。
               desc        逆序排序。",
    ":join      合并数据。
           :join[ <delimiter>[ <batch>]]
               <batch> 分组大小，必须为正整数，可选，未指定时所有数据为一组，键为组序号。",
    ":count     统计数据数量，结果为唯一的`0 -> 数量`。",
    ":renumber  从0开始重新编号。",
];

const OUTPUT_HELP: &[&str] = &[
    ":to out    输出到标准输出，未指定输出命令时的默认输出。
           :to out[ kv]
               kv  以`键<TAB>值`格式输出，未指定时只输出值。",
    ":to file   输出到文件。
           :to file <file_name>[ append][ lf|crlf][ kv]
               append  追加输出而不是覆盖。
               lf|crlf 指定换行符，未指定时使用'LF'。",
];

const FMT_HELP: &[&str] = &[
    "格式字符串语法同Rust的`format!`，可以引用的参数：
    {key}   当前数据的键。
    {value} 当前数据的值，能够无损解析为整数时按照整数格式化。
例如：
    :fmt '{key}={value}'
    :fmt '{value:>8}'
    :fmt '{value:#x}'",
];

const CONDITION_HELP: &[&str] = &[
    "len [!][<min>],[<max>]    按照字符数量范围选择，范围两端都包含，`!`表示取反。",
    "len [!]=<spec>            按照特定字符数量选择。",
    "num [!][<min>],[<max>]    按照数值范围选择，无法解析为数值时不选择。",
    "num [!]=<spec>            按照特定数值选择。",
    "num[ [!]integer|[!]float|!]
                          选择数值、整数或浮点数。",
    "key [!][<min>],[<max>]    按照整数键的范围选择，字符串键不选择。",
    "key [!]=<spec>            按照特定整数键选择。",
    "upper|lower|empty|blank   选择不含小写字母、不含大写字母、空或者全为空白字符的值。",
    "reg <exp>                 选择完整匹配正则表达式的值。",
    "条件名称前加`!`表示对整个条件取反，例如：`!empty`、`!reg '\\d+'`。",
];

pub(crate) fn print_version() {
    println!("kvp (key/value pipe) - {} - {}", env!("CARGO_PKG_VERSION"), env!("BUILD_TIME"));
}

pub(crate) fn print_help(topic: Option<String>) {
    print!("{}", help_text(topic.as_deref()));
}

fn help_text(topic: Option<&str>) -> String {
    let mut text = general_help();
    let topic = topic.map(str::to_ascii_lowercase);
    let sections: &[(&str, &[&str])] = match topic.as_deref() {
        None => &[
            ("<options> 选项：", OPTIONS_HELP),
            ("<input_cmd> 数据输入命令：", INPUT_HELP),
            ("<op_cmd> 数据操作命令：", OP_HELP),
            ("<output_cmd> 数据输出命令：", OUTPUT_HELP),
            ("格式化：", FMT_HELP),
            ("条件表达式：", CONDITION_HELP),
        ],
        Some("opt" | "options") => &[("<options> 选项：", OPTIONS_HELP)],
        Some("in" | "input") => &[("<input_cmd> 数据输入命令：", INPUT_HELP)],
        Some("op") => &[("<op_cmd> 数据操作命令：", OP_HELP)],
        Some("out" | "output") => &[("<output_cmd> 数据输出命令：", OUTPUT_HELP)],
        Some("fmt") => &[("格式化：", FMT_HELP)],
        Some("cond" | "condition") => &[("条件表达式：", CONDITION_HELP)],
        _ => &[],
    };
    for (title, lines) in sections {
        text.push_str(&format!("\n{title}\n"));
        for line in *lines {
            text.push_str(&format!("    {line}\n"));
        }
    }
    if matches!(topic.as_deref(), None | Some("code")) {
        text.push_str("\n命令退出码：\n");
        for (code, desc) in PipeErr::all_codes() {
            text.push_str(&format!("    {code:<4}{desc}\n"));
        }
    }
    text
}

fn general_help() -> String {
    format!(
        "kvp (key/value pipe) - {}\n\n{}\n\nUsage: kvp [<options>] [<input_cmd>] [<op_cmd>[ ...]] [<output_cmd>]\n\
         日志级别可以通过环境变量`{LOG_ENV}`覆盖。\n",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_DESCRIPTION"),
    )
}
