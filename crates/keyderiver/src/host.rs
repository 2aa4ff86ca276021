//! Headless form host: one input line, one form submission.
//!
//! For each line the host types the line into the password field, submits the
//! bound form and keeps the returned [`DerivationTask`]. Lines are dispatched as
//! fast as they arrive; derivations overlap freely. At end of input every
//! outstanding task is awaited and a [`HostReport`] is produced.
//!
//! A line that is not valid UTF-8 cannot be typed into a text field. It is
//! logged and counted as a failed submission, and reading carries on. A read
//! error ends the input early; tasks already dispatched are still awaited.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::deriver::{DerivationTask, KeyDeriver};
use crate::page::{Page, SubmitOutcome};

/// Tally of a host run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostReport {
    /// Lines read (= submit events dispatched, plus undecodable lines).
    pub submissions: usize,
    /// Derivations that produced a key.
    pub derived: usize,
    /// Derivations that failed and were logged, plus undecodable lines.
    pub failed: usize,
    /// Submissions whose default action was not suppressed.
    pub navigated: usize,
    /// Distinct key materials among the derived keys.
    pub distinct_keys: usize,
}

/// Drive `page` from `reader` until end of input.
///
/// # Errors
///
/// Returns an error if the page no longer has the deriver's form or password
/// field. Outstanding derivations are awaited before the error is returned.
/// Input and derivation failures are logged and counted, not returned.
pub async fn run<R>(mut page: Page, deriver: &KeyDeriver, mut reader: R) -> Result<HostReport>
where
    R: AsyncBufRead + Unpin,
{
    let mut pending: Vec<(Uuid, DerivationTask)> = Vec::new();
    let mut report = HostReport::default();
    let mut line = Zeroizing::new(Vec::new());
    let mut contract_error = None;

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "failed to read submission; treating as end of input");
                break;
            }
        }
        strip_line_ending(&mut line);

        let submission_id = Uuid::new_v4();
        report.submissions += 1;
        let Ok(password) = std::str::from_utf8(&line) else {
            report.failed += 1;
            error!(%submission_id, "submission is not valid UTF-8; skipped");
            continue;
        };

        let dispatched = info_span!("submission", %submission_id)
            .in_scope(|| dispatch(&mut page, deriver, password));
        let (outcome, task) = match dispatched {
            Ok(dispatched) => dispatched,
            Err(e) => {
                contract_error = Some(e);
                break;
            }
        };

        if outcome == SubmitOutcome::Navigated {
            report.navigated += 1;
            warn!(%submission_id, "submission was not suppressed");
        }
        pending.push((submission_id, task));
    }

    // Clear the last typed value off the page.
    if let Err(e) = page.set_input_value(deriver.password_field_id(), String::new()) {
        if contract_error.is_none() {
            contract_error = Some(e.into());
        }
    }

    let settled = pending.iter().filter(|(_, task)| task.is_finished()).count();
    debug!(
        submissions = report.submissions,
        in_flight = pending.len() - settled,
        "end of input; awaiting derivations"
    );

    let mut seen: Vec<Zeroizing<Vec<u8>>> = Vec::new();
    for (submission_id, task) in pending {
        match task.await {
            Some(key) => {
                report.derived += 1;
                match key.export_raw() {
                    Ok(material) => {
                        if !seen.iter().any(|k| k.as_slice() == material.as_slice()) {
                            seen.push(material);
                        }
                    }
                    Err(e) => {
                        warn!(%submission_id, error = %e, "derived key cannot be compared");
                    }
                }
                debug!(
                    %submission_id,
                    algorithm = %key.algorithm(),
                    extractable = key.extractable(),
                    usages = %key.usages(),
                    "derivation settled with a key"
                );
            }
            None => {
                report.failed += 1;
                debug!(%submission_id, "derivation settled without a key");
            }
        }
    }
    report.distinct_keys = seen.len();

    info!(
        submissions = report.submissions,
        derived = report.derived,
        failed = report.failed,
        navigated = report.navigated,
        distinct_keys = report.distinct_keys,
        "all submissions settled"
    );

    match contract_error {
        Some(e) => Err(e),
        None => Ok(report),
    }
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

/// Type `password` into the field and submit the form once.
fn dispatch(
    page: &mut Page,
    deriver: &KeyDeriver,
    password: &str,
) -> Result<(SubmitOutcome, DerivationTask)> {
    page.set_input_value(deriver.password_field_id(), password)?;
    let mut event = page.submit_event(deriver.form_id())?;
    let task = deriver.handle_submit(&mut event, page);
    debug!("submission dispatched");
    Ok((event.outcome(), task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use common::{Operation, ProviderError};

    use crate::crypto::{CryptoKey, MockCryptoProvider};
    use crate::session::{Session, SALT_LEN};

    fn deriver_with(mock: MockCryptoProvider) -> (Page, KeyDeriver) {
        let page = Page::new().with_form("myFormId").with_input("password", "");
        let deriver = KeyDeriver::attach(
            &page,
            "myFormId",
            "password",
            Session::with_salt([0u8; SALT_LEN]),
            Arc::new(mock),
        )
        .unwrap();
        (page, deriver)
    }

    fn mock_failing_on(bad: &'static [u8]) -> MockCryptoProvider {
        let mut mock = MockCryptoProvider::new();
        mock.expect_import_key().returning(move |raw, alg, ext, usages| {
            if raw.as_slice() == bad {
                Err(ProviderError::new(Operation::Import, "rejected"))
            } else {
                Ok(CryptoKey::new(alg, ext, usages, raw))
            }
        });
        mock.expect_derive_key().returning(|_, _, target, ext, usages| {
            Ok(CryptoKey::new(target, ext, usages, Zeroizing::new(vec![0u8; 32])))
        });
        mock
    }

    #[tokio::test]
    async fn every_line_is_a_submission() {
        let (page, deriver) = deriver_with(mock_failing_on(b"bad"));
        let input: &[u8] = b"first\n\nbad\n";

        let report = run(page, &deriver, input).await.unwrap();
        assert_eq!(
            report,
            HostReport {
                submissions: 3,
                derived: 2,
                failed: 1,
                navigated: 0,
                distinct_keys: 1,
            }
        );
    }

    #[tokio::test]
    async fn undecodable_line_is_counted_and_reading_continues() {
        let (page, deriver) = deriver_with(mock_failing_on(b"bad"));
        let input: &[u8] = b"first\nsecond\n\xff\xfe\nfourth\n";

        let report = run(page, &deriver, input).await.unwrap();
        assert_eq!(
            report,
            HostReport {
                submissions: 4,
                derived: 3,
                failed: 1,
                navigated: 0,
                distinct_keys: 1,
            }
        );
    }

    #[tokio::test]
    async fn distinct_keys_counts_repeated_passwords_once() {
        let mut mock = MockCryptoProvider::new();
        mock.expect_import_key()
            .returning(|raw, alg, ext, usages| Ok(CryptoKey::new(alg, ext, usages, raw)));
        // Echo the password as key material so equal passwords give equal keys.
        mock.expect_derive_key().returning(|_, base, target, ext, usages| {
            let material = Zeroizing::new(base.material().to_vec());
            Ok(CryptoKey::new(target, ext, usages, material))
        });
        let (page, deriver) = deriver_with(mock);
        let input: &[u8] = b"alpha\nbeta\nalpha\n";

        let report = run(page, &deriver, input).await.unwrap();
        assert_eq!(report.derived, 3);
        assert_eq!(report.distinct_keys, 2);
    }

    #[tokio::test]
    async fn empty_input_submits_nothing() {
        let mut mock = MockCryptoProvider::new();
        mock.expect_import_key().never();
        let (page, deriver) = deriver_with(mock);
        let input: &[u8] = b"";

        let report = run(page, &deriver, input).await.unwrap();
        assert_eq!(report, HostReport::default());
    }

    #[test]
    fn strip_line_ending_handles_lf_crlf_and_bare() {
        for (raw, want) in [
            (&b"a\n"[..], &b"a"[..]),
            (&b"a\r\n"[..], &b"a"[..]),
            (&b"a"[..], &b"a"[..]),
            (&b"a\r"[..], &b"a\r"[..]),
        ] {
            let mut line = raw.to_vec();
            strip_line_ending(&mut line);
            assert_eq!(line, want);
        }
    }

    #[tokio::test]
    async fn crlf_is_not_part_of_the_password() {
        let mut mock = MockCryptoProvider::new();
        mock.expect_import_key()
            .withf(|raw, _, _, _| raw.as_slice() == b"secret")
            .times(1)
            .returning(|raw, alg, ext, usages| Ok(CryptoKey::new(alg, ext, usages, raw)));
        mock.expect_derive_key().returning(|_, _, target, ext, usages| {
            Ok(CryptoKey::new(target, ext, usages, Zeroizing::new(vec![0u8; 32])))
        });
        let (page, deriver) = deriver_with(mock);
        let input: &[u8] = b"secret\r\n";

        let report = run(page, &deriver, input).await.unwrap();
        assert_eq!(report.derived, 1);
    }
}
