/// Length of every generated feed id.
pub const ID_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Derive the fixed-length id for a feed key string.
///
/// The input's characters are partitioned into `ID_LENGTH` strided groups:
/// group `i` holds the characters at positions `i, i+stride, i+2*stride, …`
/// with `stride = max(len / ID_LENGTH, 1)`. Each group's code points are
/// summed and reduced modulo the alphabet size to pick one character.
///
/// The result is a deterministic fingerprint, not a collision-free hash;
/// colliding inputs are resolved first-writer-wins by the store.
pub fn feed_id(input: &str) -> String {
    let chars: Vec<u32> = input.chars().map(|c| c as u32).collect();
    let stride = (chars.len() / ID_LENGTH).max(1);

    let mut id = String::with_capacity(ID_LENGTH);
    for group in 0..ID_LENGTH {
        let sum: u64 = chars
            .iter()
            .skip(group)
            .step_by(stride)
            .map(|&c| u64::from(c))
            .sum();
        id.push(ALPHABET[(sum % ALPHABET.len() as u64) as usize] as char);
    }
    id
}
