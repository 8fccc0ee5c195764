mod filter_tests;
mod hash_tests;
