pub mod github;
pub mod leetcode;
pub mod months;
