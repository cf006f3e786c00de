use winnow::Bytes;

/// Complete input, running out of bytes is an error rather than a request for more
pub type Stream<'i> = &'i Bytes;

pub fn new(b: &[u8]) -> Stream<'_> {
    Bytes::new(b)
}
