//! Scanned code classification

use std::io::BufRead;
use std::str::FromStr;

use anyhow::{Context, Result};
use dsplay_sdk::{Mode, PlayToken};

/// What a scanned code asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode {
    /// `cmd:<word>`
    Command(String),
    /// `mode:audio` or `mode:video`
    SwitchMode(Mode),
    /// `room:<name>`
    SwitchRoom(String),
    /// A play token printed on a card
    Play(PlayToken),
    /// A library reference still to be resolved
    Reference(String),
}

impl ScannedCode {
    /// Commands may repeat; any other code is ignored when scanned twice
    pub fn repeatable(&self) -> bool {
        matches!(self, ScannedCode::Command(_))
    }
}

impl FromStr for ScannedCode {
    type Err = anyhow::Error;

    fn from_str(code: &str) -> Result<Self> {
        let code = code.trim();
        if let Some(word) = code.strip_prefix("cmd:") {
            return Ok(ScannedCode::Command(word.to_string()));
        }
        if let Some(mode) = code.strip_prefix("mode:") {
            let mode = mode.parse::<Mode>().with_context(|| format!("bad mode card '{}'", code))?;
            return Ok(ScannedCode::SwitchMode(mode));
        }
        if let Some(room) = code.strip_prefix("room:") {
            anyhow::ensure!(!room.trim().is_empty(), "room card without a name");
            return Ok(ScannedCode::SwitchRoom(room.trim().to_string()));
        }
        if PlayToken::is_token(code) {
            let token = code.parse::<PlayToken>().with_context(|| format!("bad play token '{}'", code))?;
            return Ok(ScannedCode::Play(token));
        }
        Ok(ScannedCode::Reference(code.to_string()))
    }
}

/// A line without its `#` comment, or `None` when nothing is left
pub fn clean(line: &str) -> Option<&str> {
    let code = line.split('#').next().unwrap_or_default().trim();
    (!code.is_empty()).then_some(code)
}

/// Read codes one per line, dropping `#` comments and blank lines
pub fn read_codes<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut codes = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read codes")?;
        if let Some(code) = clean(&line) {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsplay_sdk::AudioPlayToken;
    use rstest::rstest;

    #[rstest]
    #[case("cmd:play", ScannedCode::Command("play".into()))]
    #[case("mode:audio", ScannedCode::SwitchMode(Mode::Audio))]
    #[case("room:Living Room", ScannedCode::SwitchRoom("Living Room".into()))]
    #[case("dsaudio:song=42", ScannedCode::Reference("dsaudio:song=42".into()))]
    #[case(
        r#"dsaudio:{"type":"song","id":"42"}"#,
        ScannedCode::Play(PlayToken::Audio(AudioPlayToken::song("42")))
    )]
    fn test_classify(#[case] code: &str, #[case] expected: ScannedCode) {
        assert_eq!(code.parse::<ScannedCode>().unwrap(), expected);
    }

    #[rstest]
    #[case("mode:radio")]
    #[case("room: ")]
    #[case(r#"dsaudio:{"type":"song"}"#)]
    fn test_classify_errors(#[case] code: &str) {
        assert!(code.parse::<ScannedCode>().is_err());
    }

    #[test]
    fn test_read_codes_strips_comments() {
        let input = "# header\ncmd:play  # start\n\n   \ndsvideo:movie_id=7\n";
        let codes = read_codes(input.as_bytes()).unwrap();
        assert_eq!(codes, vec!["cmd:play", "dsvideo:movie_id=7"]);
    }
}
