#[macro_export]
macro_rules! throw {
    ($msg:expr, $exit:expr) => {
        println!("{}{}", "error: ".red().bold(), $msg.to_string().red());
        if $exit {
            std::process::exit(1);
        }
    };
    ($msg:expr) => {
        println!("{}{}", "error: ".red().bold(), $msg.to_string().red())
    };
}
