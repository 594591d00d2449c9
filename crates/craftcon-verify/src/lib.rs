//! Conservation verification.
//!
//! The worlds this client manages maintain a conservation invariant: the
//! `alpha` and `omega` scores of an objective must always sum to 15. This
//! crate checks that invariant, either on numbers the caller already has
//! ([`verify`]) or by reading both scores over a live connection
//! ([`verify_from_remote`]).
//!
//! Both paths produce the same [`ConservationReport`], so a broken sum
//! and an unreadable score look alike to downstream consumers: a non-ok
//! report with a `failure` reason. The remote path is deliberately
//! strict — a reply that doesn't parse is a failure, never a guessed
//! number.

use std::sync::LazyLock;

use craftcon_client::RconClient;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// What `alpha + omega` must equal.
pub const TARGET_SUM: f64 = 15.0;

/// Residual allowed by [`verify`] before the sum counts as broken.
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// The score line the server prints for `scoreboard players get`:
/// `<holder> has <value> [<objective>]`.
static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"has (-?\d+)").expect("score pattern is a valid regex")
});

/// The outcome of one conservation check.
///
/// One shape for every way a check can go: arithmetic violations and
/// read failures both yield `ok: false` with `failure` explaining why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConservationReport {
    /// Whether the invariant held.
    pub ok: bool,
    pub alpha: f64,
    pub omega: f64,
    /// `alpha + omega`.
    pub sum: f64,
    /// `|sum - TARGET_SUM|`.
    pub residual: f64,
    /// The tolerance the check was run with.
    pub tolerance: f64,
    /// Why the check failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl ConservationReport {
    /// A report for a check that never got as far as two numbers.
    fn unreadable(reason: String) -> Self {
        Self {
            ok: false,
            alpha: 0.0,
            omega: 0.0,
            sum: 0.0,
            residual: TARGET_SUM,
            tolerance: DEFAULT_TOLERANCE,
            failure: Some(reason),
        }
    }
}

/// Checks `alpha + omega == TARGET_SUM` with the default tolerance.
pub fn verify(alpha: f64, omega: f64) -> ConservationReport {
    verify_with_tolerance(alpha, omega, DEFAULT_TOLERANCE)
}

/// Checks the conservation sum against an explicit tolerance. A residual
/// exactly at the tolerance passes.
pub fn verify_with_tolerance(alpha: f64, omega: f64, tolerance: f64) -> ConservationReport {
    let sum = alpha + omega;
    let residual = (sum - TARGET_SUM).abs();
    let ok = residual <= tolerance;

    let failure = (!ok).then(|| {
        format!(
            "conservation violated: alpha {alpha} + omega {omega} = {sum}, \
             expected {TARGET_SUM} (residual {residual})"
        )
    });

    ConservationReport {
        ok,
        alpha,
        omega,
        sum,
        residual,
        tolerance,
        failure,
    }
}

/// Reads `alpha` and `omega` from the named objective over a live
/// connection and checks the sum.
///
/// Failures never escape as errors: an unreachable server, a command
/// timeout, or a reply that doesn't look like a score all come back as a
/// non-ok report naming the score that couldn't be read.
pub async fn verify_from_remote(client: &RconClient, objective: &str) -> ConservationReport {
    let alpha = match read_score(client, "alpha", objective).await {
        Ok(value) => value,
        Err(reason) => return ConservationReport::unreadable(reason),
    };
    let omega = match read_score(client, "omega", objective).await {
        Ok(value) => value,
        Err(reason) => return ConservationReport::unreadable(reason),
    };

    let report = verify(alpha, omega);
    tracing::info!(
        objective,
        alpha,
        omega,
        ok = report.ok,
        "conservation check completed"
    );
    report
}

async fn read_score(
    client: &RconClient,
    holder: &str,
    objective: &str,
) -> Result<f64, String> {
    let reply = client
        .exec(&format!("scoreboard players get {holder} {objective}"))
        .await
        .map_err(|err| format!("failed to read score `{holder}`: {err}"))?;

    parse_score(&reply.body).ok_or_else(|| {
        format!(
            "unexpected scoreboard reply for `{holder}`: {:?}",
            reply.body
        )
    })
}

/// Extracts the integer score from the server's score line, if the reply
/// has one.
fn parse_score(body: &str) -> Option<f64> {
    let caps = SCORE_PATTERN.captures(body)?;
    caps[1].parse::<i64>().ok().map(|value| value as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_conserved_pair_is_ok() {
        let report = verify(7.0, 8.0);

        assert!(report.ok);
        assert_eq!(report.sum, 15.0);
        assert_eq!(report.residual, 0.0);
        assert!(report.failure.is_none());
    }

    #[test]
    fn test_verify_broken_pair_reports_residual() {
        let report = verify(7.0, 7.0);

        assert!(!report.ok);
        assert_eq!(report.sum, 14.0);
        assert_eq!(report.residual, 1.0);
        let failure = report.failure.expect("broken sum must carry a reason");
        assert!(failure.contains("14"), "reason should name the sum: {failure}");
    }

    #[test]
    fn test_verify_with_tolerance_residual_at_bound_passes() {
        // Powers-of-two fractions keep the arithmetic exact.
        let report = verify_with_tolerance(7.25, 8.0, 0.25);

        assert!(report.ok);
        assert_eq!(report.residual, 0.25);
    }

    #[test]
    fn test_verify_with_tolerance_residual_past_bound_fails() {
        let report = verify_with_tolerance(7.5, 8.0, 0.25);

        assert!(!report.ok);
        assert_eq!(report.residual, 0.5);
    }

    #[test]
    fn test_verify_negative_scores_sum_correctly() {
        let report = verify(-5.0, 20.0);

        assert!(report.ok);
        assert_eq!(report.sum, 15.0);
    }

    #[test]
    fn test_parse_score_reads_the_score_line() {
        assert_eq!(parse_score("alpha has 7 [resonance]"), Some(7.0));
        assert_eq!(parse_score("omega has -3 [resonance]"), Some(-3.0));
    }

    #[test]
    fn test_parse_score_rejects_non_score_replies() {
        assert_eq!(parse_score("Unknown scoreboard objective 'resonance'"), None);
        assert_eq!(parse_score(""), None);
    }

    #[test]
    fn test_report_serializes_as_camel_case_without_null_failure() {
        let json: serde_json::Value =
            serde_json::to_value(verify(7.0, 8.0)).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["sum"], 15.0);
        assert_eq!(json["tolerance"], DEFAULT_TOLERANCE);
        assert!(json.get("failure").is_none());
    }
}
