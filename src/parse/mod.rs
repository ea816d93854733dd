//! 命令行解析，分为两层：
//!  - `token`：按照类PosixShell的规则拆分文本，以及条件参数的细粒度解析；
//!  - `args`：将参数序列解析为输入、操作和输出命令。

pub(crate) mod args;
pub(crate) mod token;
