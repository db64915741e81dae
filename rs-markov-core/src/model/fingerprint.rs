/// Generator polynomial of the fingerprint CRC (ECMA-182 polynomial).
pub const POLYNOMIAL: u64 = 0x42F0_E1EB_A9EA_3693;

/// Bit-reversed polynomial, used by the reflected table-driven algorithm.
const REFLECTED_POLYNOMIAL: u64 = POLYNOMIAL.reverse_bits();

/// Lookup table for byte-at-a-time processing, built at compile time.
const TABLE: [u64; 256] = build_table();

const fn build_table() -> [u64; 256] {
	let mut table = [0u64; 256];
	let mut i = 0;
	while i < 256 {
		let mut crc = i as u64;
		let mut bit = 0;
		while bit < 8 {
			if crc & 1 != 0 {
				crc = (crc >> 1) ^ REFLECTED_POLYNOMIAL;
			} else {
				crc >>= 1;
			}
			bit += 1;
		}
		table[i] = crc;
		i += 1;
	}
	table
}

/// Incremental CRC-64 digest used to key prefixes in the chain.
///
/// Parameters: polynomial `0x42F0E1EBA9EA3693`, reflected input and output,
/// initial value `0`, final XOR `0`.
///
/// This is not CRC-64/ECMA-182, which uses the same polynomial without
/// reflection (boost `crc_optimal<64, 0x42F0E1EBA9EA3693, 0, 0, false, false>`).
/// Chains keyed with that variant produce different fingerprints for the same
/// prefix and cannot be read by this crate.
///
/// The digest is fed token by token, so no intermediate string has to be
/// assembled to fingerprint a prefix.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fingerprint {
	crc: u64,
}

impl Fingerprint {
	pub fn new() -> Self {
		Self { crc: 0 }
	}

	/// Feeds raw bytes into the digest.
	pub fn update(&mut self, bytes: &[u8]) {
		let mut crc = self.crc;
		for &byte in bytes {
			crc = TABLE[((crc ^ byte as u64) & 0xFF) as usize] ^ (crc >> 8);
		}
		self.crc = crc;
	}

	/// Returns the current checksum.
	pub fn finish(&self) -> u64 {
		self.crc
	}

	/// One-shot checksum of `bytes`.
	pub fn checksum(bytes: &[u8]) -> u64 {
		let mut digest = Self::new();
		digest.update(bytes);
		digest.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn check_value() {
		assert_eq!(Fingerprint::checksum(b"123456789"), 0x2B9C_7EE4_E278_0C8A);
	}

	#[test]
	fn empty_input_is_zero() {
		assert_eq!(Fingerprint::checksum(b""), 0);
	}

	#[test]
	fn incremental_matches_one_shot() {
		let mut digest = Fingerprint::new();
		digest.update(b"HELLO");
		digest.update(b" ");
		assert_eq!(digest.finish(), Fingerprint::checksum(b"HELLO "));
		assert_eq!(digest.finish(), 0xC57B_A0F8_E200_8442);
	}
}
