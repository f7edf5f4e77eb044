#![no_main]
use libfuzzer_sys::fuzz_target;

use lexicon_avl::model::{run_index_equivalence, IndexOp};

fuzz_target!(|ops: Vec<IndexOp>| { run_index_equivalence(ops) });
