//! Line-based console transport

use async_trait::async_trait;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

use crate::domain::interaction::{InteractionError, InteractionTransport};

/// Talks to the operator over a line-oriented reader and writer
pub struct ConsoleTransport<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

impl ConsoleTransport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    async fn write_line(&self, line: &str) -> Result<(), InteractionError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    async fn prompt(&self, prompt: &str) -> Result<String, InteractionError> {
        {
            let mut writer = self.writer.lock().await;
            writer.write_all(prompt.as_bytes()).await?;
            writer.flush().await?;
        }

        let mut line = String::new();
        let read = self.reader.lock().await.read_line(&mut line).await?;
        if read == 0 {
            return Err(InteractionError::closed("end of operator input"));
        }
        Ok(line.trim().to_string())
    }
}

#[async_trait]
impl<R, W> InteractionTransport for ConsoleTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn notify(&self, message: &str) -> Result<(), InteractionError> {
        self.write_line(message.trim_end()).await
    }

    async fn confirm(&self, message: &str) -> Result<(), InteractionError> {
        self.prompt(&format!("{} [press Enter] ", message.trim_end()))
            .await
            .map(|_| ())
    }

    async fn request_input(&self, prompt: &str) -> Result<String, InteractionError> {
        self.prompt(&format!("{} ", prompt.trim_end())).await
    }

    async fn ask_retry(&self, prompt: &str) -> Result<bool, InteractionError> {
        let answer = self.prompt(&format!("{} [y/N] ", prompt.trim_end())).await?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn show_post_sequence(&self, message: &str) -> Result<(), InteractionError> {
        self.write_line(&format!(">> {}", message.trim_end())).await
    }
}
