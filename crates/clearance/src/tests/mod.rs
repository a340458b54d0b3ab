mod common;
mod review;
mod transitions;
