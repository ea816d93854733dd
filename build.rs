use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const BUILD_TIME_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn main() {
    // build.rs 改变时重新运行
    println!("cargo:rerun-if-changed=build.rs");
    // 注入为环境变量，供主程序通过 env! 读取
    println!("cargo:rustc-env=BUILD_TIME={}", get_build_time());
}

fn get_build_time() -> String {
    // 优先尝试本地时间
    if let Ok(local) = time::OffsetDateTime::now_local()
        && let Ok(formatted) = local.format(BUILD_TIME_FMT)
    {
        return formatted;
    }
    // 回退到 UTC 时间
    match time::OffsetDateTime::now_utc().format(BUILD_TIME_FMT) {
        Ok(formatted) => format!("{} (UTC)", formatted),
        Err(_) => "unknown-build-time".to_string(),
    }
}
