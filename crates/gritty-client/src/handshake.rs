/// Whether the `terminal` handshake has gone out on the current connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handshake {
    #[default]
    AwaitingHandshake,
    HandshakeSent,
}

impl Handshake {
    /// Returns `true` exactly once per connection: the first call moves the
    /// state to `HandshakeSent`, later calls return `false`.
    pub fn claim(&mut self) -> bool {
        match self {
            Handshake::AwaitingHandshake => {
                *self = Handshake::HandshakeSent;
                true
            }
            Handshake::HandshakeSent => false,
        }
    }

    /// Forget the handshake, e.g. after the connection dropped.
    pub fn reset(&mut self) {
        *self = Handshake::AwaitingHandshake;
    }
}
