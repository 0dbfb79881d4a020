//! Scenario scripts: an ordered list of timed governance commands.
//!
//! ```toml
//! [[step]]
//! at = 1000
//! op = "mint"
//! to = "alice"
//! amount = "100"
//!
//! [[step]]
//! at = 1001
//! op = "start_voting"
//! caller = "alice"
//! duration = 86400
//! description = "raise the cap"
//! ```
//!
//! Accounts are labels (or `0x` hex addresses); amounts are decimal or `0x`
//! hex strings so they are not limited to 64 bits.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

use gvl_sdk::{
    parse_amount, Address, Amount, Clock, Governance, ManualClock, Outcome, SdkResult,
    Timestamp, VoteStatus, VotingId,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    /// Clock reading for this step. Must not precede the previous step.
    pub at: u64,
    /// The step must be rejected by the ledger or voting engine.
    #[serde(default)]
    pub expect_error: bool,
    #[serde(flatten)]
    pub op: Operation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Mint {
        to: String,
        amount: String,
    },
    Burn {
        from: String,
        amount: String,
    },
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
    ClearHistory {
        account: String,
    },
    StartVoting {
        caller: String,
        duration: u64,
        #[serde(default)]
        description: String,
    },
    Vote {
        caller: String,
        voting: u64,
        status: VoteStatus,
    },
    Execute {
        voting: u64,
        #[serde(default)]
        expect: Option<Outcome>,
    },
    BalanceAt {
        account: String,
        instant: u64,
        #[serde(default)]
        expect: Option<String>,
    },
    GetVoting {
        voting: u64,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::Burn { .. } => "burn",
            Self::Transfer { .. } => "transfer",
            Self::ClearHistory { .. } => "clear_history",
            Self::StartVoting { .. } => "start_voting",
            Self::Vote { .. } => "vote",
            Self::Execute { .. } => "execute",
            Self::BalanceAt { .. } => "balance_at",
            Self::GetVoting { .. } => "get_voting",
        }
    }
}

/// What happened at one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub at: u64,
    pub op: String,
    pub ok: bool,
    pub detail: String,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Run every step in order against `gov`, driving `clock` to each `at`.
    ///
    /// Stops at the first step whose result contradicts its expectations.
    pub fn run(&self, gov: &Governance, clock: &ManualClock) -> anyhow::Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let now = clock.now();
            if Timestamp::from_secs(step.at) < now {
                bail!("step {index}: at {} precedes previous step at {now}", step.at);
            }
            clock.set(Timestamp::from_secs(step.at));

            let op = step.op.name();
            let report = match apply(gov, &step.op) {
                Ok(detail) => {
                    if step.expect_error {
                        bail!("step {index} ({op}): expected an error, got: {detail}");
                    }
                    StepReport {
                        index,
                        at: step.at,
                        op: op.to_owned(),
                        ok: true,
                        detail,
                    }
                }
                Err(StepError::Rejected(e)) if step.expect_error => StepReport {
                    index,
                    at: step.at,
                    op: op.to_owned(),
                    ok: false,
                    detail: e.to_string(),
                },
                Err(StepError::Rejected(e)) => {
                    return Err(anyhow!(e).context(format!("step {index} ({op}) was rejected")));
                }
                Err(StepError::Script(e)) => {
                    return Err(e.context(format!("step {index} ({op})")));
                }
            };
            reports.push(report);
        }
        Ok(reports)
    }
}

/// A step can fail because the system refused it or because the script
/// itself is wrong. Only the former can be expected.
enum StepError {
    Rejected(gvl_sdk::SdkError),
    Script(anyhow::Error),
}

impl From<gvl_sdk::SdkError> for StepError {
    fn from(e: gvl_sdk::SdkError) -> Self {
        Self::Rejected(e)
    }
}

impl From<anyhow::Error> for StepError {
    fn from(e: anyhow::Error) -> Self {
        Self::Script(e)
    }
}

fn apply(gov: &Governance, op: &Operation) -> Result<String, StepError> {
    let detail = match op {
        Operation::Mint { to, amount } => {
            let (to, amount) = (account(to)?, amount_of(amount)?);
            let entry = gov.mint(&to, amount)?;
            format!("{} (balance {})", entry.event, gov.balance_of(&to)?)
        }
        Operation::Burn { from, amount } => {
            let (from, amount) = (account(from)?, amount_of(amount)?);
            let entry = gov.burn(&from, amount)?;
            format!("{} (balance {})", entry.event, gov.balance_of(&from)?)
        }
        Operation::Transfer { from, to, amount } => {
            let (from, to, amount) = (account(from)?, account(to)?, amount_of(amount)?);
            gov.transfer(&from, &to, amount)?.event.to_string()
        }
        Operation::ClearHistory { account: label } => {
            gov.clear_account_history(&account(label)?)?.event.to_string()
        }
        Operation::StartVoting {
            caller,
            duration,
            description,
        } => {
            let id = gov.start_voting(&account(caller)?, *duration, description)?;
            let voting = gov.get_voting(id)?;
            format!("voting {id} open until {}", voting.closes_at())
        }
        Operation::Vote {
            caller,
            voting,
            status,
        } => {
            let record = gov.vote(&account(caller)?, VotingId::new(*voting), *status)?;
            format!("{caller} votes {} with weight {}", record.status, record.weight)
        }
        Operation::Execute { voting, expect } => {
            let result = gov.execute_voting(VotingId::new(*voting))?;
            if let Some(expected) = expect {
                if *expected != result.outcome {
                    return Err(StepError::Script(anyhow!(
                        "voting {} resolved {}, expected {expected}",
                        result.id,
                        result.outcome
                    )));
                }
            }
            format!(
                "voting {} {} (participation {}, quorum {})",
                result.id, result.outcome, result.participation, result.quorum
            )
        }
        Operation::BalanceAt {
            account: label,
            instant,
            expect,
        } => {
            let balance = gov.balance_at(&account(label)?, Timestamp::from_secs(*instant))?;
            if let Some(expected) = expect {
                let expected = amount_of(expected)?;
                if expected != balance {
                    return Err(StepError::Script(anyhow!(
                        "{label} held {balance} at {instant}, expected {expected}"
                    )));
                }
            }
            format!("{label} held {balance} at {instant}")
        }
        Operation::GetVoting { voting } => describe(gov, VotingId::new(*voting))?,
    };
    Ok(detail)
}

fn describe(gov: &Governance, id: VotingId) -> SdkResult<String> {
    let voting = gov.get_voting(id)?;
    let outcome = voting
        .outcome
        .map(|o| o.to_string())
        .unwrap_or_else(|| "-".into());
    Ok(format!(
        "voting {id} [{}] accepted {} rejected {} outcome {outcome}: {}",
        gov.voting_state(id)?,
        voting.total_accepted,
        voting.total_rejected,
        voting.description
    ))
}

/// Resolve a script account: `0x` hex is taken literally, anything else is a label.
pub fn account(name: &str) -> anyhow::Result<Address> {
    if name.starts_with("0x") {
        Address::from_hex(name).with_context(|| format!("bad address {name}"))
    } else {
        Ok(Address::from_label(name))
    }
}

fn amount_of(text: &str) -> anyhow::Result<Amount> {
    parse_amount(text).with_context(|| format!("bad amount {text}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gvl_sdk::VotingConfig;

    use super::*;

    fn run(text: &str) -> anyhow::Result<Vec<StepReport>> {
        let clock = Arc::new(ManualClock::new(Timestamp::zero()));
        let gov = Governance::new(VotingConfig::default(), clock.clone()).unwrap();
        Script::parse(text)?.run(&gov, &clock)
    }

    const VOTING: &str = r#"
        [[step]]
        at = 100
        op = "mint"
        to = "alice"
        amount = "100"

        [[step]]
        at = 101
        op = "start_voting"
        caller = "alice"
        duration = 10
        description = "cap"

        [[step]]
        at = 102
        op = "vote"
        caller = "alice"
        voting = 0
        status = "accept"

        [[step]]
        at = 111
        op = "vote"
        caller = "alice"
        voting = 0
        status = "reject"
        expect_error = true

        [[step]]
        at = 111
        op = "execute"
        voting = 0
        expect = "accepted"

        [[step]]
        at = 112
        op = "balance_at"
        account = "alice"
        instant = 99
        expect = "0"
    "#;

    #[test]
    fn parses_all_fields() {
        let script = Script::parse(VOTING).unwrap();
        assert_eq!(script.steps.len(), 6);
        assert!(script.steps[3].expect_error);
        assert!(matches!(
            script.steps[2].op,
            Operation::Vote {
                status: VoteStatus::Accept,
                ..
            }
        ));
        assert_eq!(script.steps[4].op.name(), "execute");
    }

    #[test]
    fn runs_a_voting_lifecycle() {
        let reports = run(VOTING).unwrap();
        assert_eq!(reports.len(), 6);
        assert!(reports[3].detail.contains("closed"));
        assert!(!reports[3].ok);
        assert!(reports[4].detail.contains("Accepted"));
        assert!(reports.iter().filter(|r| r.ok).count() == 5);
    }

    #[test]
    fn unexpected_rejection_aborts() {
        let err = run(r#"
            [[step]]
            at = 1
            op = "burn"
            from = "bob"
            amount = "1"
        "#)
        .unwrap_err();
        assert!(err.to_string().contains("step 0 (burn)"));
    }

    #[test]
    fn failed_expectation_aborts() {
        let err = run(r#"
            [[step]]
            at = 1
            op = "mint"
            to = "bob"
            amount = "0x10"

            [[step]]
            at = 2
            op = "balance_at"
            account = "bob"
            instant = 2
            expect = "15"
        "#)
        .unwrap_err();
        assert!(format!("{err:#}").contains("expected 15"));
    }

    #[test]
    fn unexpected_success_aborts() {
        let err = run(r#"
            [[step]]
            at = 1
            op = "mint"
            to = "bob"
            amount = "1"
            expect_error = true
        "#)
        .unwrap_err();
        assert!(err.to_string().contains("expected an error"));
    }

    #[test]
    fn steps_must_not_go_back_in_time() {
        let err = run(r#"
            [[step]]
            at = 10
            op = "mint"
            to = "bob"
            amount = "1"

            [[step]]
            at = 9
            op = "mint"
            to = "bob"
            amount = "1"
        "#)
        .unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn hex_accounts_resolve_literally() {
        let alice = Address::from_label("alice");
        assert_eq!(account(&alice.to_hex()).unwrap(), alice);
        assert_eq!(account("alice").unwrap(), alice);
        assert!(account("0xzz").is_err());
    }

    #[test]
    fn empty_script_runs() {
        assert!(run("").unwrap().is_empty());
    }
}
