pub mod stage2_aggregate;
pub mod stage3_rank;
pub mod stage4_report;
