use ammocheck::error::AppResult;

fn main() -> AppResult<()> {
    ammocheck::entry::run()
}
