pub fn run() -> anyhow::Result<()> {
    println!("hud {}", env!("CARGO_PKG_VERSION"));
    println!("Next-token confidence overlay for source code");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
