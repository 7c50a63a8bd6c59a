use env_logger::Env;

/// 初始化日誌，`RUST_LOG` 未設定時只輸出警告以上
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}
