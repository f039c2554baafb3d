pub mod client_mgr;
pub mod mac_slot_mgr;
pub mod phy_sched;

// Re-export commonly used items
pub use client_mgr::{ClientMgrErr, MacClientMgr};
pub use mac_slot_mgr::{MacErr, MacSlotMgr, SlotStatus};
pub use phy_sched::{LogPhySched, PhySchedTrait};
