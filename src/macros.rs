/// Helper macro for reading locked items
///
/// ```rust, ignore
///  let parts = read_lock!(self.parts);
///  println!("{}", parts.len());
/// ```
macro_rules! read_lock {
    ($rwlock:expr) => {
        $rwlock.read().expect("Failed to acquire read lock")
    };
}

/// Helper macro for writing to locked items
///
/// ```rust, ignore
///  let mut parts = write_lock!(self.parts);
///  parts.clear();
/// ```
macro_rules! write_lock {
    ($rwlock:expr) => {
        $rwlock.write().expect("Failed to acquire write lock")
    };
}
