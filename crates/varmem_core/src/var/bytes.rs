use crate::var::{Result, VarError};

/// Bounded little-endian cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return the unread tail without advancing.
	pub fn rest(&self) -> &'a [u8] {
		&self.bytes[self.pos.min(self.bytes.len())..]
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(VarError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a fixed-size byte array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i64`.
	pub fn read_i64_le(&mut self) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	/// Read a zero-terminated byte string without the terminator.
	///
	/// A missing terminator consumes the rest of the input.
	pub fn read_cstring_bytes(&mut self) -> &'a [u8] {
		let rem = self.rest();
		match rem.iter().position(|byte| *byte == 0) {
			Some(end) => {
				self.pos += end + 1;
				&rem[..end]
			}
			None => {
				self.pos = self.bytes.len();
				rem
			}
		}
	}

	/// Read a zero-terminated string, replacing invalid UTF-8.
	pub fn read_cstring(&mut self) -> String {
		String::from_utf8_lossy(self.read_cstring_bytes()).into_owned()
	}
}

/// Append `text` followed by a NUL terminator.
pub(crate) fn put_cstring(out: &mut Vec<u8>, text: &str) {
	out.extend_from_slice(text.as_bytes());
	out.push(0);
}
