fn main() -> std::io::Result<()> {
    leetcode_analytics_lib::run()
}
