use std::convert::TryFrom;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RedeemState {
    #[default]
    Idle,
    Requesting,
    Revealed,
    Failed,
}

impl fmt::Display for RedeemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Requesting => write!(f, "Requesting"),
            Self::Revealed => write!(f, "Revealed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum RedeemEvent {
    Request(String),
    Accepted(String),
    Rejected(String),
    Dismiss,
}

impl fmt::Display for RedeemEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(voucher) => write!(f, "Request({voucher})"),
            Self::Accepted(code) => write!(f, "Accepted({code})"),
            Self::Rejected(reason) => write!(f, "Rejected({reason})"),
            Self::Dismiss => write!(f, "Dismiss"),
        }
    }
}

#[derive(Debug)]
pub struct StateTransitionError {
    pub from: RedeemState,
    pub event: RedeemEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// One redemption at a time: request, then the code modal or a failure,
/// then back to idle.
#[derive(Debug, Default)]
pub struct RedeemFlow {
    state: RedeemState,
    voucher_id: Option<String>,
}

impl RedeemFlow {
    pub const fn state(&self) -> RedeemState {
        self.state
    }

    pub fn voucher_id(&self) -> Option<&str> {
        self.voucher_id.as_deref()
    }

    pub fn is_requesting(&self) -> bool {
        self.state == RedeemState::Requesting
    }

    pub fn process_event(&mut self, event: &RedeemEvent) -> Result<(), StateTransitionError> {
        let next = NextState::try_from((self.state, event))?;
        self.voucher_id = match (next.0, event) {
            (RedeemState::Requesting, RedeemEvent::Request(voucher)) => Some(voucher.clone()),
            (RedeemState::Idle, _) => None,
            _ => self.voucher_id.take(),
        };
        self.state = next.0;
        Ok(())
    }
}

struct NextState(RedeemState);

impl RedeemState {
    const fn next_state(self) -> NextState {
        NextState(self)
    }
}

impl TryFrom<(RedeemState, &RedeemEvent)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (RedeemState, &RedeemEvent)) -> Result<Self, Self::Error> {
        let (current, event) = value;

        match (current, event) {
            (RedeemState::Idle | RedeemState::Failed, RedeemEvent::Request(_)) => {
                Ok(RedeemState::Requesting.next_state())
            }
            (RedeemState::Requesting, RedeemEvent::Accepted(_)) => {
                Ok(RedeemState::Revealed.next_state())
            }
            (RedeemState::Requesting, RedeemEvent::Rejected(_)) => {
                Ok(RedeemState::Failed.next_state())
            }
            (RedeemState::Revealed | RedeemState::Failed, RedeemEvent::Dismiss) => {
                Ok(RedeemState::Idle.next_state())
            }
            _ => Err(StateTransitionError {
                from: current,
                event: event.clone(),
            }),
        }
    }
}
