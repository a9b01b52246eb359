use plug_scene::settings::Settings;

fn main() -> anyhow::Result<()> {
    plug_scene::app::run(Settings::from_env())
}
