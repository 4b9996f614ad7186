use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::{CodecError, LineCodec};
use crate::reply::Reply;

/// One client connection: a Unix stream framed into request lines and reply lines.
pub struct Connection {
    pub id: Uuid,
    framed: Framed<UnixStream, LineCodec>,
}

impl Connection {
    pub fn new(stream: UnixStream, max_line_length: usize) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            framed: Framed::new(stream, LineCodec::new(max_line_length)),
        }
    }

    /// Reads the next request line. `None` means the client closed the connection.
    pub async fn read_line(&mut self) -> Result<Option<String>, CodecError> {
        self.framed.next().await.transpose()
    }

    /// Writes one reply and flushes it to the socket.
    pub async fn write_reply(&mut self, reply: &Reply) -> Result<(), CodecError> {
        self.framed.send(reply).await
    }
}
