//! Parsing of free-text altitude lists such as `"0, 1000, 5000"`.

use aeroperf_core::constants::{ALTITUDE_INPUT_MAX_M, ALTITUDE_INPUT_MIN_M};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("no altitudes entered")]
    Empty,
    #[error("please enter altitudes as comma-separated numbers (could not read `{token}`)")]
    InvalidNumber { token: String },
}

/// Parse a comma-separated altitude list.
///
/// One malformed entry rejects the whole list. Well-formed values outside
/// `[0, 12000]` m are dropped without error, so the result may be empty.
pub fn parse_altitude_list(text: &str) -> Result<Vec<f64>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let values = text
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<f64>, ParseError>>()?;

    Ok(values
        .into_iter()
        .filter(|&h| {
            let keep = (ALTITUDE_INPUT_MIN_M..=ALTITUDE_INPUT_MAX_M).contains(&h);
            if !keep {
                debug!(altitude = h, "dropping altitude outside input range");
            }
            keep
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_keeps_order() {
        assert_eq!(
            parse_altitude_list("5000, 0,8000").unwrap(),
            vec![5_000.0, 0.0, 8_000.0]
        );
        assert_eq!(parse_altitude_list(" 1e3 ").unwrap(), vec![1_000.0]);
    }

    #[test]
    fn drops_out_of_range_values_silently() {
        assert_eq!(
            parse_altitude_list("-10, 0, 12000, 12000.5, 99999").unwrap(),
            vec![0.0, 12_000.0]
        );
        assert!(parse_altitude_list("-1, 20000").unwrap().is_empty());
        assert!(parse_altitude_list("nan, inf").unwrap().is_empty());
    }

    #[test]
    fn one_bad_token_rejects_everything() {
        assert_eq!(
            parse_altitude_list("0, 1000, abc"),
            Err(ParseError::InvalidNumber {
                token: "abc".to_string()
            })
        );
        assert!(matches!(
            parse_altitude_list("0, 1000,"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_altitude_list("0 1000"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn blank_input_is_an_error() {
        assert_eq!(parse_altitude_list("   "), Err(ParseError::Empty));
    }
}
