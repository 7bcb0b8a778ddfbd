use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

use firmata_adaptor::errors::Error;
use firmata_adaptor::pause;
use firmata_adaptor::utils::task;

#[firmata_adaptor_macros::runtime]
async fn example_runtime_function() {
    println!("Running example runtime function");
}

#[firmata_adaptor_macros::runtime]
async fn runtime_with_result(flag: Arc<AtomicU8>) -> Result<u8, Error> {
    let moved_flag = flag.clone();
    task::run(async move {
        pause!(200);
        moved_flag.fetch_add(1, Ordering::SeqCst);
    })?;
    Ok(1)
}

#[firmata_adaptor_macros::test]
async fn example_test_function() {
    println!("Running example test function");
}

#[test]
fn test_runtime_macro() {
    example_runtime_function();
}

#[test]
fn test_runtime_waits_for_tasks() {
    let flag = Arc::new(AtomicU8::new(0));
    let start = Instant::now();
    let result = runtime_with_result(flag.clone());
    assert_eq!(result.unwrap(), 1);
    assert_eq!(flag.load(Ordering::SeqCst), 1, "The spawned task ran to completion");
    assert!(start.elapsed().as_millis() >= 200);
}
