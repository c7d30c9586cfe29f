//! Console output with the three fixed prefixes: `[*]` informational,
//! `[!]` warning, `[>]` command echo. Every line is mirrored into the
//! log file so build transcripts survive the terminal.

pub fn info(message: impl AsRef<str>) {
    let message = message.as_ref();
    println!("[*] {}", message);
    log::info!("{}", message);
}

pub fn warn(message: impl AsRef<str>) {
    let message = message.as_ref();
    println!("[!] {}", message);
    log::warn!("{}", message);
}

pub fn command(message: impl AsRef<str>) {
    let message = message.as_ref();
    println!("[>] {}", message);
    log::info!("exec: {}", message);
}
