use rand::Rng;

/// Alphanumeric secret of the given length, used for generated device ids.
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat(())
        .map(|()| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(secret_len)
        .collect()
}
