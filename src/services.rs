pub mod db;
pub mod issues;
