fn main() -> Result<(), Box<dyn std::error::Error>> {
    emotion_agent::cli::main()
}
