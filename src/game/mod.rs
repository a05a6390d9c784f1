//! Sessions, members, and end-of-session rewards.

pub mod member;
pub mod rewards;
pub mod session;

pub use member::{Member, MemberId, MemberVars, VarValue};
pub use rewards::RewardGrant;
pub use session::{
    ActionOutcome, ActionRecord, Game, PlayerAction, SessionState, BASIC_ATTACK_ENERGY,
};
