use bytes::{BufMut, BytesMut};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio_serial::SerialPortBuilderExt;
use tokio_util::codec::{Decoder, Encoder, Framed};

/// Line codec for the auxiliary microcontroller link: outbound lines are
/// CR/LF terminated, inbound lines are newline-terminated only (§6).
#[derive(Default)]
pub struct UartCodec;

impl Decoder for UartCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        let Some(pos) = src.iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };
        let mut line = src.split_to(pos + 1);
        line.truncate(line.len() - 1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        let text = String::from_utf8_lossy(&line).into_owned();
        Ok(Some(text))
    }
}

impl Encoder<String> for UartCodec {
    type Error = std::io::Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 2);
        dst.put_slice(item.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

pub struct UartPort {
    framed: Framed<tokio_serial::SerialStream, UartCodec>,
}

impl UartPort {
    pub fn open(path: &str, baud: u32) -> Result<Self, tokio_serial::Error> {
        let port = tokio_serial::new(path, baud).open_native_async()?;
        Ok(Self {
            framed: Framed::new(port, UartCodec),
        })
    }

    /// Split into an independent reader/writer pair so the UART-drain task
    /// and the `nav.cmd`-drain task (§5's "two cooperating threads") can
    /// each own one half without sharing a lock on the port itself.
    pub fn split(self) -> (UartReader, UartWriter) {
        let (sink, stream) = self.framed.split();
        (UartReader { stream }, UartWriter { sink })
    }
}

pub struct UartReader {
    stream: SplitStream<Framed<tokio_serial::SerialStream, UartCodec>>,
}

impl UartReader {
    pub async fn read_line(&mut self) -> Option<std::io::Result<String>> {
        self.stream.next().await
    }
}

pub struct UartWriter {
    sink: SplitSink<Framed<tokio_serial::SerialStream, UartCodec>, String>,
}

impl UartWriter {
    pub async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.sink.send(line.to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_newline_terminated_line() {
        let mut codec = UartCodec;
        let mut buf = BytesMut::from(&b"DATA:S1:1.0\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line, "DATA:S1:1.0");
        assert!(buf.is_empty());
    }

    #[test]
    fn decodes_crlf_terminated_line() {
        let mut codec = UartCodec;
        let mut buf = BytesMut::from(&b"ACK:STOP:OK\r\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(line, "ACK:STOP:OK");
    }

    #[test]
    fn partial_line_is_not_yet_decoded() {
        let mut codec = UartCodec;
        let mut buf = BytesMut::from(&b"DATA:S1"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn encodes_with_crlf_terminator() {
        let mut codec = UartCodec;
        let mut buf = BytesMut::new();
        codec.encode("FORWARD".to_owned(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"FORWARD\r\n");
    }
}
