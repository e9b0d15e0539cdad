pub mod core {
    pub mod controls;
    pub mod handle_race;
    pub mod kinematics;
    pub mod progress;
    pub mod race;
    pub mod racer;
    pub mod steering;
    pub mod track;
}
pub mod interfaces {
    pub mod hud_interface;
}
pub mod post {
    pub mod race_result;
}
pub mod pre {
    pub mod builtin_tracks;
    pub mod read_sim_pars;
    pub mod sim_opts;
}
