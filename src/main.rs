use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, terminal,
};

use flappy_term::audio::Audio;
use flappy_term::config::{self, Args};
use flappy_term::consts::TICK_INTERVAL;
use flappy_term::input::{self, Command};
use flappy_term::render::{self, PixelBuf, Viewport};
use flappy_term::sim::GameEvent;
use flappy_term::Game;

fn main() -> Result<()> {
    let args = Args::parse();
    config::init_logging();

    let seed = args.seed_or_random();
    log::info!("Flappy Term starting with seed {}", seed);

    let audio = if args.mute {
        None
    } else {
        match Audio::open() {
            Ok(audio) => Some(audio),
            Err(e) => {
                log::warn!("Audio disabled: {:#}", e);
                None
            }
        }
    };

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        terminal::SetTitle("Flappy Term"),
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let mut final_scores = Vec::new();
    let result = run(&mut out, seed, audio.as_ref(), &mut final_scores);
    cleanup(&mut out)?;

    for score in final_scores {
        writeln!(out, "Final Score: {}", score)?;
    }
    result
}

fn run(out: &mut io::Stdout, seed: u64, audio: Option<&Audio>, final_scores: &mut Vec<u32>) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let mut view = Viewport::for_terminal(cols, rows);
    let mut game = Game::new(seed);

    let started = Instant::now();
    let frame_dur = TICK_INTERVAL;

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            match input::map_event(&ev, &view, &game) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Jump) => game.jump(),
                Some(Command::Restart) => game.restart(),
                Some(Command::Resize(c, r)) => {
                    buf.resize(c as usize, r as usize * 2);
                    view = Viewport::for_terminal(c, r);
                }
                None => {}
            }
        }

        // Update
        game.advance_to(started.elapsed());
        for ev in game.drain_events() {
            if let GameEvent::GameOver { score } = ev {
                final_scores.push(score);
                if let Some(audio) = audio {
                    if let Err(e) = audio.play_game_over() {
                        log::warn!("Could not play sound: {:#}", e);
                    }
                }
            }
        }

        // Render
        render::draw(game.canvas(), &view, &mut buf);
        buf.render(out)?;
        render::draw_text(game.canvas(), &view, &buf, out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
