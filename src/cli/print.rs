
macro_rules! quiz_command_prefix {
    () => ({
        use std::io::Write;
        print!("quizgen> ");
        std::io::stdout().flush().expect("Output flush failed");
    });
}

/// Prints a message that arrives while the prompt is waiting, then redraws the prompt.
macro_rules! quiz_print {
    ($($arg:tt)*) => ({
        println!();
        println!($($arg)*);
        quiz_command_prefix!();
    })
}
