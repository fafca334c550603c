use std::path::Path;

use tokio::io::AsyncBufReadExt;

use crate::{account::Account, constants::PRIVATE_KEYS_FILE_PATH};

pub async fn read_file_lines(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let file = tokio::fs::read(path).await?;
    let mut lines = file.lines();

    let mut contents = vec![];
    while let Some(line) = lines.next_line().await? {
        contents.push(line);
    }

    Ok(contents)
}

pub async fn read_accounts() -> eyre::Result<Vec<Account>> {
    let lines = read_file_lines(PRIVATE_KEYS_FILE_PATH).await?;
    parse_accounts(&lines)
}

pub fn parse_accounts(lines: &[impl AsRef<str>]) -> eyre::Result<Vec<Account>> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.as_ref().trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            let private_key = line.split(':').next().unwrap_or(line).trim();
            Account::from_private_key(private_key)
                .map_err(|e| eyre::eyre!("Invalid private key on line {line_no}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn skips_comments_and_blank_lines() {
        let lines = [
            "# main wallets",
            "",
            "   ",
            ANVIL_KEY,
            "  # disabled",
        ];

        let accounts = parse_accounts(&lines).unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0].address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn uses_key_before_first_colon() {
        let line = format!("{ANVIL_KEY}:some-label:extra");

        let accounts = parse_accounts(&[line]).unwrap();

        assert_eq!(
            accounts[0].address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn reports_line_of_invalid_key() {
        let lines = [ANVIL_KEY, "", "not-a-key"];

        let err = parse_accounts(&lines).unwrap_err();

        assert!(err.to_string().contains("line 3"), "{err}");
    }
}
