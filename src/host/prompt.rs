/// User-facing notifications and the blocking yes/no question
pub(crate) trait Prompter {
    /// Non-error notification; hosts may suppress these in quiet mode
    fn info(&mut self, message: &str);

    fn error(&mut self, message: &str);

    fn confirm(&mut self, question: &str) -> bool;
}
